//! Menu actions: each one wires a pipeline to a tool
//!
//! Input problems (bad path, nothing matching, nothing selected) are shown as
//! warnings and the action ends without a report. Only prompt I/O failures
//! are returned as errors.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::config::Config;
use super::prompts::Prompter;
use crate::pipeline::{
    expand_path, resolve_root, resolve_selection, Assembled, Pipeline, PipelineError, Produced,
    Root, TypeFilter, DOCX, IMAGES, PDF, WORD,
};
use crate::report::{display_name, generate_report, RunReport};
use crate::tools::email::{send_files, Mailer, SmtpMailer};
use crate::tools::office::Office;
use crate::tools::organize::{sort_file, SortKey};
use crate::tools::pdf::{self, UnlockStatus};
use crate::tools::{raster, sibling_path, word, ToolError};
use crate::utils::{
    create_spinner, finish_with_success, print_info, print_success, print_warning, with_spinner,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MergePdfs,
    SplitPdf,
    WordToPdf,
    ImageToPdf,
    MergeWord,
    SplitWord,
    ProtectPdf,
    UnlockPdf,
    SortByType,
    SortByDate,
    FileReport,
    EmailFiles,
}

impl Action {
    pub const DOCUMENT_TOOLS: [Action; 8] = [
        Action::MergePdfs,
        Action::SplitPdf,
        Action::WordToPdf,
        Action::ImageToPdf,
        Action::MergeWord,
        Action::SplitWord,
        Action::ProtectPdf,
        Action::UnlockPdf,
    ];

    pub const ORGANIZER: [Action; 2] = [Action::SortByType, Action::SortByDate];

    pub const EMAIL_AND_REPORTS: [Action; 2] = [Action::FileReport, Action::EmailFiles];

    pub fn title(&self) -> &'static str {
        match self {
            Action::MergePdfs => "Merge PDFs",
            Action::SplitPdf => "Split PDF",
            Action::WordToPdf => "Convert Word to PDF",
            Action::ImageToPdf => "Convert Image to PDF",
            Action::MergeWord => "Merge Word Documents",
            Action::SplitWord => "Split Word Document",
            Action::ProtectPdf => "Protect PDF",
            Action::UnlockPdf => "Unlock PDF",
            Action::SortByType => "Sort Files by Type",
            Action::SortByDate => "Sort Files by Date",
            Action::FileReport => "Generate CSV File Report",
            Action::EmailFiles => "Send Files by Email",
        }
    }
}

/// Configured sender plus the transport used to reach it
pub struct Outbox {
    pub sender: String,
    pub mailer: Box<dyn Mailer>,
}

/// Everything an action needs besides the prompter
pub struct Session {
    pub config: Config,
    pub office: Office,
    pub outbox: Option<Outbox>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let outbox = config.mail.clone().map(|settings| Outbox {
            sender: settings.sender.clone(),
            mailer: Box::new(SmtpMailer::new(settings)) as Box<dyn Mailer>,
        });
        Self {
            office: Office::new(config.office_bin.clone()),
            config,
            outbox,
        }
    }

    pub fn with_outbox(mut self, outbox: Option<Outbox>) -> Self {
        self.outbox = outbox;
        self
    }

    fn pipeline(&self, description: &str, filter: TypeFilter) -> Pipeline {
        Pipeline::new(description, filter).policy(self.config.selection)
    }

    fn default_dir(&self) -> String {
        self.config.start_dir.display().to_string()
    }
}

/// Run one action to completion.
///
/// Returns the per-item report for actions that process a selection.
pub fn run_action(
    action: Action,
    session: &Session,
    prompter: &mut dyn Prompter,
) -> Result<Option<RunReport>> {
    tracing::info!(action = action.title(), "action started");
    match action {
        Action::MergePdfs => merge_pdfs(session, prompter),
        Action::SplitPdf => split_pdf(session, prompter),
        Action::WordToPdf => word_to_pdf(session, prompter),
        Action::ImageToPdf => image_to_pdf(session, prompter),
        Action::MergeWord => merge_word(session, prompter),
        Action::SplitWord => split_word(session, prompter),
        Action::ProtectPdf => protect_pdf(session, prompter),
        Action::UnlockPdf => unlock_pdf(session, prompter),
        Action::SortByType => sort_files(session, prompter, SortKey::Type),
        Action::SortByDate => sort_files(session, prompter, SortKey::Date),
        Action::FileReport => file_report(session, prompter),
        Action::EmailFiles => email_files(session, prompter),
    }
}

/// Ask for a path and let the user pick items under it.
fn gather(
    session: &Session,
    prompter: &mut dyn Prompter,
    pipeline: &Pipeline,
    prompt: &str,
) -> Result<Option<(PathBuf, Vec<PathBuf>)>> {
    let raw = prompter.input(prompt, Some(&session.default_dir()))?;
    let root = expand_path(&raw);
    match pipeline.collect(&root, &mut *prompter) {
        Ok(items) => Ok(Some((root, items))),
        Err(PipelineError::Prompt(err)) => {
            Err(err).context("Failed to read selection")
        }
        Err(err) => {
            print_warning(&err.to_string());
            Ok(None)
        }
    }
}

fn output_name(prompter: &mut dyn Prompter, default: &str, extension: &str) -> Result<String> {
    let name = prompter.input("Output file name", Some(default))?;
    let name = if name.is_empty() { default.to_string() } else { name };
    let suffix = format!(".{}", extension);
    if name.to_lowercase().ends_with(&suffix) {
        Ok(name)
    } else {
        Ok(format!("{}{}", name, suffix))
    }
}

/// `Ok(false)` when `output` exists and the user declines to replace it.
fn confirm_overwrite(prompter: &mut dyn Prompter, output: &Path) -> Result<bool> {
    if !output.exists() {
        return Ok(true);
    }
    let replace = prompter.confirm(
        &format!("{} already exists. Replace it?", display_name(output)),
        false,
    )?;
    if !replace {
        print_warning("Cancelled; existing file kept");
    }
    Ok(replace)
}

fn merge_pdfs(session: &Session, prompter: &mut dyn Prompter) -> Result<Option<RunReport>> {
    let pipeline = session.pipeline("PDF", PDF).folders_only();
    let Some((root, items)) = gather(session, prompter, &pipeline, "Folder containing PDFs")?
    else {
        return Ok(None);
    };
    let output = root.join(output_name(prompter, "merged.pdf", "pdf")?);
    if !confirm_overwrite(prompter, &output)? {
        return Ok(None);
    }

    Ok(Some(pipeline.run_atomic(
        Action::MergePdfs.title(),
        &items,
        |items| with_spinner("Merging PDFs...", || pdf::merge_pdfs(items, &output)),
    )))
}

/// Pages chosen for one PDF before splitting starts
enum PagePlan {
    Pages(Vec<u32>),
    Nothing,
    Unreadable(ToolError),
}

fn split_pdf(session: &Session, prompter: &mut dyn Prompter) -> Result<Option<RunReport>> {
    let pipeline = session.pipeline("PDF", PDF).default_selection("1");
    let Some((_, items)) = gather(session, prompter, &pipeline, "PDF file or folder")? else {
        return Ok(None);
    };
    let policy = session.config.selection;

    let mut plans = Vec::with_capacity(items.len());
    for file in &items {
        let total = match pdf::page_count(file) {
            Ok(total) => total,
            Err(err) => {
                plans.push(PagePlan::Unreadable(err));
                continue;
            }
        };
        let answer = prompter
            .input(
                &format!("Pages to keep from {} (1-{})", display_name(file), total),
                Some(&format!("1-{}", total)),
            )
            .context("Failed to read page selection")?;
        let selection = resolve_selection(&answer, total, policy);
        if let Some(warning) = &selection.warning {
            print_warning(&format!("Invalid page selection: {}", warning));
        }
        plans.push(if selection.is_empty() {
            PagePlan::Nothing
        } else {
            PagePlan::Pages(selection.indices.iter().map(|&i| i as u32).collect())
        });
    }

    let mut plans = plans.into_iter();
    Ok(Some(pipeline.run_each(
        Action::SplitPdf.title(),
        &items,
        |file| -> Result<Produced, ToolError> {
            match plans.next() {
                Some(PagePlan::Pages(pages)) => {
                    let output = sibling_path(file, "_split_selected", "pdf");
                    pdf::split_pdf(file, &pages, &output)?;
                    Ok(Produced::Output(output))
                }
                Some(PagePlan::Unreadable(err)) => Err(err),
                Some(PagePlan::Nothing) | None => {
                    Ok(Produced::Skipped("no pages selected".to_string()))
                }
            }
        },
    )))
}

fn word_to_pdf(session: &Session, prompter: &mut dyn Prompter) -> Result<Option<RunReport>> {
    let pipeline = session
        .pipeline("Word document", WORD)
        .default_selection("1");
    let Some((_, items)) = gather(session, prompter, &pipeline, "Word file or folder")? else {
        return Ok(None);
    };

    Ok(Some(pipeline.run_each(
        Action::WordToPdf.title(),
        &items,
        |file| {
            with_spinner(&format!("Converting {}...", display_name(file)), || {
                session.office.word_to_pdf(file).map(Produced::Output)
            })
        },
    )))
}

fn image_to_pdf(session: &Session, prompter: &mut dyn Prompter) -> Result<Option<RunReport>> {
    let pipeline = session.pipeline("image", IMAGES);
    let Some((root, items)) = gather(session, prompter, &pipeline, "Image file or folder")?
    else {
        return Ok(None);
    };

    if root.is_dir() {
        let output = root.join(output_name(prompter, "images_merged.pdf", "pdf")?);
        if !confirm_overwrite(prompter, &output)? {
            return Ok(None);
        }
        return Ok(Some(pipeline.run_atomic(
            Action::ImageToPdf.title(),
            &items,
            |items| with_spinner("Building PDF...", || raster::images_to_pdf(items, &output)),
        )));
    }

    Ok(Some(pipeline.run_each(
        Action::ImageToPdf.title(),
        &items,
        |file| {
            let output = sibling_path(file, "", "pdf");
            raster::image_to_pdf(file, &output).map(|_| Produced::Output(output))
        },
    )))
}

/// Upgrade legacy `.doc` inputs, then merge, reporting against the originals.
fn merge_converted(office: &Office, items: &[PathBuf], output: &Path) -> Result<Assembled> {
    let mut rejected = Vec::new();
    let mut converted: Vec<(PathBuf, PathBuf)> = Vec::new();
    for item in items {
        match office.ensure_docx(item) {
            Ok(docx) => converted.push((item.clone(), docx)),
            Err(err) => rejected.push((item.clone(), err.to_string())),
        }
    }

    let sources: Vec<PathBuf> = converted.iter().map(|(_, docx)| docx.clone()).collect();
    let merged = match word::merge_docx(&sources, output) {
        Ok(merged) => merged,
        Err(err) => {
            let reason = err.to_string();
            rejected.extend(converted.into_iter().map(|(item, _)| (item, reason.clone())));
            return Ok(Assembled {
                output: None,
                included: Vec::new(),
                rejected,
            });
        }
    };
    let original = |docx: &PathBuf| {
        converted
            .iter()
            .find(|(_, d)| d == docx)
            .map(|(o, _)| o.clone())
            .unwrap_or_else(|| docx.clone())
    };

    rejected.extend(
        merged
            .rejected
            .iter()
            .map(|(docx, reason)| (original(docx), reason.clone())),
    );
    Ok(Assembled {
        output: merged.output,
        included: merged.included.iter().map(original).collect(),
        rejected,
    })
}

fn merge_word(session: &Session, prompter: &mut dyn Prompter) -> Result<Option<RunReport>> {
    let pipeline = session.pipeline("Word document", WORD).folders_only();
    let Some((root, items)) =
        gather(session, prompter, &pipeline, "Folder containing Word documents")?
    else {
        return Ok(None);
    };
    let output = root.join(word::MERGED_FILE_NAME);
    if !confirm_overwrite(prompter, &output)? {
        return Ok(None);
    }

    Ok(Some(pipeline.run_atomic(
        Action::MergeWord.title(),
        &items,
        |items| {
            with_spinner("Merging documents...", || {
                merge_converted(&session.office, items, &output)
            })
        },
    )))
}

fn split_word(session: &Session, prompter: &mut dyn Prompter) -> Result<Option<RunReport>> {
    let pipeline = session
        .pipeline("Word document", DOCX)
        .default_selection("1");
    let Some((_, items)) = gather(session, prompter, &pipeline, "Word file or folder")? else {
        return Ok(None);
    };

    let answer = prompter.input("Paragraphs per part", Some("5"))?;
    let per_part = match answer.trim().parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => {
            print_warning(&format!("'{}' is not a positive number", answer.trim()));
            return Ok(None);
        }
    };

    Ok(Some(pipeline.run_each(
        Action::SplitWord.title(),
        &items,
        |file| {
            word::split_docx(file, per_part).map(|split| match split {
                Some((dir, _)) => Produced::Output(dir),
                None => Produced::Skipped("document has no paragraphs".to_string()),
            })
        },
    )))
}

fn protect_pdf(session: &Session, prompter: &mut dyn Prompter) -> Result<Option<RunReport>> {
    let pipeline = session.pipeline("PDF", PDF).default_selection("1");
    let Some((_, items)) = gather(session, prompter, &pipeline, "PDF file or folder")? else {
        return Ok(None);
    };
    let password = prompter.secret("Password to set", true)?;
    if password.is_empty() {
        print_warning("Password must not be empty");
        return Ok(None);
    }

    Ok(Some(pipeline.run_each(
        Action::ProtectPdf.title(),
        &items,
        |file| {
            let output = sibling_path(file, "_protected", "pdf");
            pdf::protect_pdf(file, &password, &output).map(|_| Produced::Output(output))
        },
    )))
}

fn unlock_pdf(session: &Session, prompter: &mut dyn Prompter) -> Result<Option<RunReport>> {
    let pipeline = session.pipeline("PDF", PDF).default_selection("1");
    let Some((_, items)) = gather(session, prompter, &pipeline, "PDF file or folder")? else {
        return Ok(None);
    };
    let password = prompter.secret("Password", false)?;

    Ok(Some(pipeline.run_each(
        Action::UnlockPdf.title(),
        &items,
        |file| {
            let output = sibling_path(file, "_unlocked", "pdf");
            pdf::unlock_pdf(file, &password, &output).map(|status| match status {
                UnlockStatus::Unlocked => Produced::Output(output),
                UnlockStatus::NotEncrypted => Produced::Skipped("not encrypted".to_string()),
            })
        },
    )))
}

fn sort_files(
    session: &Session,
    prompter: &mut dyn Prompter,
    key: SortKey,
) -> Result<Option<RunReport>> {
    let pipeline = session
        .pipeline("file", TypeFilter::RegularFiles)
        .folders_only();
    let Some((root, items)) = gather(session, prompter, &pipeline, "Folder to organize")? else {
        return Ok(None);
    };
    let action = match key {
        SortKey::Type => Action::SortByType,
        SortKey::Date => Action::SortByDate,
    };

    let report = pipeline.run_each(action.title(), &items, |file| {
        sort_file(&root, file, key).map(Produced::Output)
    });
    print_info(&format!("Moved {} file(s)", report.succeeded()));
    Ok(Some(report))
}

fn file_report(session: &Session, prompter: &mut dyn Prompter) -> Result<Option<RunReport>> {
    let raw = prompter.input("Folder to report on", Some(&session.default_dir()))?;
    let dir = match resolve_root(&expand_path(&raw)) {
        Ok(Root::Directory(dir)) => dir,
        Ok(Root::File(file)) => {
            print_warning(&PipelineError::NotADirectory(file).to_string());
            return Ok(None);
        }
        Err(err) => {
            print_warning(&err.to_string());
            return Ok(None);
        }
    };

    let spinner = create_spinner("Collecting file details...");
    match generate_report(&dir) {
        Ok(Some(path)) => {
            finish_with_success(&spinner, "Report ready");
            print_success(&format!("CSV report saved as {}", path.display()));
        }
        Ok(None) => {
            spinner.finish_and_clear();
            print_warning(&format!("No files found in {}", dir.display()));
        }
        Err(err) => {
            spinner.finish_and_clear();
            print_warning(&format!("Could not write report: {:#}", err));
        }
    }
    Ok(None)
}

fn email_files(session: &Session, prompter: &mut dyn Prompter) -> Result<Option<RunReport>> {
    let Some(outbox) = &session.outbox else {
        print_warning(
            "Email is not configured. Set SMARTTERM_SENDER_EMAIL and SMARTTERM_SENDER_PASSWORD.",
        );
        return Ok(None);
    };

    let pipeline = session
        .pipeline("file", TypeFilter::RegularFiles)
        .folders_only();
    let Some((_, items)) = gather(session, prompter, &pipeline, "Folder with files to send")?
    else {
        return Ok(None);
    };
    let receiver = prompter.input("Receiver email", None)?;
    if receiver.is_empty() {
        print_warning("No receiver given");
        return Ok(None);
    }

    let report = pipeline.run_atomic(Action::EmailFiles.title(), &items, |items| {
        with_spinner("Sending email...", || {
            send_files(outbox.mailer.as_ref(), &outbox.sender, &receiver, items)
        })
    });
    if report.failed() == 0 {
        print_success(&format!("Email sent to {}", receiver));
    }
    Ok(Some(report))
}
