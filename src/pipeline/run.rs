//! The enumerate → select → transform → report shape shared by every tool
//!
//! A [`Pipeline`] knows what kind of item a tool works on and how the user
//! picks among them. Tools supply the transform: either per item, where each
//! call is fault-isolated, or across the whole selection at once.

use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};

use super::candidates::{enumerate, resolve_root, Root, TypeFilter};
use super::error::PipelineError;
use super::selector::{resolve_selection, SelectionPolicy};
use crate::report::{Outcome, RunReport};
use crate::utils::{print_item_outcome, print_listing, print_warning};

/// Source of selection expressions for a numbered listing.
pub trait Chooser {
    fn ask_selection(&mut self, prompt: &str, default: &str) -> io::Result<String>;
}

/// Result of a per-item transform that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Produced {
    /// Wrote this artifact
    Output(PathBuf),
    /// Completed without a file artifact of its own
    Done,
    /// Left the item alone on purpose
    Skipped(String),
}

impl From<Produced> for Outcome {
    fn from(produced: Produced) -> Self {
        match produced {
            Produced::Output(path) => Outcome::Succeeded { output: Some(path) },
            Produced::Done => Outcome::Succeeded { output: None },
            Produced::Skipped(reason) => Outcome::Skipped { reason },
        }
    }
}

/// Result of a whole-selection transform.
#[derive(Debug, Clone, Default)]
pub struct Assembled {
    /// Artifact written for the selection, if any
    pub output: Option<PathBuf>,
    /// Items that made it into the artifact
    pub included: Vec<PathBuf>,
    /// Items left out, with the reason
    pub rejected: Vec<(PathBuf, String)>,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    description: String,
    filter: TypeFilter,
    default_selection: String,
    policy: SelectionPolicy,
    allow_single_file: bool,
}

impl Pipeline {
    /// `description` names one item in messages ("PDF", "image", "file").
    pub fn new(description: impl Into<String>, filter: TypeFilter) -> Self {
        Self {
            description: description.into(),
            filter,
            default_selection: "all".to_string(),
            policy: SelectionPolicy::default(),
            allow_single_file: true,
        }
    }

    pub fn default_selection(mut self, default: impl Into<String>) -> Self {
        self.default_selection = default.into();
        self
    }

    pub fn policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Require the root to be a folder.
    pub fn folders_only(mut self) -> Self {
        self.allow_single_file = false;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Steps 1 and 2: resolve `root`, list matching items, and ask which to use.
    ///
    /// A single matching file is returned as-is without prompting.
    pub fn collect<C: Chooser + ?Sized>(
        &self,
        root: &Path,
        chooser: &mut C,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let candidates = match resolve_root(root)? {
            Root::File(file) if self.allow_single_file => {
                if self.filter.matches(&file) {
                    return Ok(vec![file]);
                }
                return Err(PipelineError::WrongType {
                    path: file,
                    description: self.description.clone(),
                });
            }
            Root::File(file) => return Err(PipelineError::NotADirectory(file)),
            Root::Directory(dir) => {
                let found = enumerate(&dir, self.filter)?;
                if found.is_empty() {
                    return Err(PipelineError::NoMatchingItems {
                        dir,
                        description: self.description.clone(),
                    });
                }
                found
            }
        };

        print_listing(&self.description, &candidates);
        let answer = chooser.ask_selection(
            &format!("Enter number(s) (1-{})", candidates.len()),
            &self.default_selection,
        )?;

        let selection = resolve_selection(&answer, candidates.len(), self.policy);
        if let Some(warning) = &selection.warning {
            match self.policy {
                SelectionPolicy::FallbackToAll => print_warning(&format!(
                    "Invalid input ({}), selecting all {}s instead.",
                    warning, self.description
                )),
                SelectionPolicy::Strict => {
                    print_warning(&format!("Invalid input: {}", warning))
                }
            }
        }

        let picked = selection.pick(&candidates);
        if picked.is_empty() {
            return Err(PipelineError::NothingSelected {
                description: self.description.clone(),
            });
        }
        tracing::info!(
            description = %self.description,
            selected = picked.len(),
            of = candidates.len(),
            "selection resolved"
        );
        Ok(picked)
    }

    /// Step 3 and 4 for tools that treat each item independently.
    pub fn run_each<F, E>(&self, action: &str, items: &[PathBuf], mut transform: F) -> RunReport
    where
        F: FnMut(&Path) -> Result<Produced, E>,
        E: Display,
    {
        let mut report = RunReport::new(action);
        for item in items {
            let outcome = match transform(item) {
                Ok(produced) => produced.into(),
                Err(err) => {
                    tracing::warn!(item = %item.display(), error = %err, "item failed");
                    Outcome::Failed {
                        reason: format!("{:#}", err),
                    }
                }
            };
            print_item_outcome(item, &outcome);
            report.record(item, outcome);
        }
        report
    }

    /// Step 3 and 4 for tools that turn the whole selection into one artifact.
    ///
    /// Items the transform rejected keep their own reason. If the transform
    /// fails outright, every item is reported as failed with the same reason.
    pub fn run_atomic<F, E>(&self, action: &str, items: &[PathBuf], transform: F) -> RunReport
    where
        F: FnOnce(&[PathBuf]) -> Result<Assembled, E>,
        E: Display,
    {
        let mut report = RunReport::new(action);
        match transform(items) {
            Ok(assembled) => {
                if assembled.included.is_empty() {
                    print_warning("None of the selected items could be used; no output written.");
                }
                for item in items {
                    let outcome = if let Some((_, reason)) =
                        assembled.rejected.iter().find(|(path, _)| path == item)
                    {
                        Outcome::Failed {
                            reason: reason.clone(),
                        }
                    } else if assembled.included.contains(item) {
                        Outcome::Succeeded {
                            output: assembled.output.clone(),
                        }
                    } else {
                        Outcome::Skipped {
                            reason: "not included".to_string(),
                        }
                    };
                    print_item_outcome(item, &outcome);
                    report.record(item, outcome);
                }
            }
            Err(err) => {
                let reason = format!("{:#}", err);
                tracing::warn!(action, error = %reason, "selection failed as a whole");
                for item in items {
                    let outcome = Outcome::Failed {
                        reason: reason.clone(),
                    };
                    print_item_outcome(item, &outcome);
                    report.record(item, outcome);
                }
            }
        }
        report
    }
}
