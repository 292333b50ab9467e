//! Voice assistant mode
//!
//! A phrase is matched against an ordered keyword table; the first entry
//! whose keywords all start a word of the phrase decides the intent, so
//! "merge PDFs" counts as "merge pdf".

use std::io;
use std::process::Command;

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;

use crate::utils::{print_assistant, print_section_header, print_warning, MIC};

/// What a listen attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heard {
    Phrase(String),
    /// Nothing was said before the listener gave up
    Silence,
    /// Speech recognition could not run at all
    Unavailable(String),
}

pub trait Speech {
    fn speak(&mut self, text: &str);
    fn listen(&mut self) -> Heard;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    MergePdf,
    SplitPdf,
    ProtectPdf,
    UnlockPdf,
    WordToPdf,
    ImageToPdf,
}

impl Capability {
    pub fn announcement(&self) -> &'static str {
        match self {
            Capability::MergePdf => "Merging PDF files.",
            Capability::SplitPdf => "Splitting a PDF file.",
            Capability::ProtectPdf => "Protecting a PDF with a password.",
            Capability::UnlockPdf => "Unlocking a protected PDF.",
            Capability::WordToPdf => "Converting Word documents to PDF.",
            Capability::ImageToPdf => "Converting images to PDF.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Exit,
    Run(Capability),
    Unknown,
}

const KEYWORDS: &[(&[&str], Intent)] = &[
    (&["exit"], Intent::Exit),
    (&["quit"], Intent::Exit),
    (&["merge", "pdf"], Intent::Run(Capability::MergePdf)),
    (&["split", "pdf"], Intent::Run(Capability::SplitPdf)),
    (&["protect", "pdf"], Intent::Run(Capability::ProtectPdf)),
    (&["unlock", "pdf"], Intent::Run(Capability::UnlockPdf)),
    (&["word", "to", "pdf"], Intent::Run(Capability::WordToPdf)),
    (&["convert", "word"], Intent::Run(Capability::WordToPdf)),
    (&["image", "to", "pdf"], Intent::Run(Capability::ImageToPdf)),
];

pub fn resolve_intent(phrase: &str) -> Intent {
    let phrase = phrase.to_lowercase();
    let words: Vec<&str> = phrase
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    KEYWORDS
        .iter()
        .find(|(keys, _)| keys.iter().all(|k| words.iter().any(|w| w.starts_with(k))))
        .map(|(_, intent)| *intent)
        .unwrap_or(Intent::Unknown)
}

/// Listen and dispatch until the user says exit.
///
/// Returns to the caller after `max_unavailable` consecutive failed listens.
pub fn run_voice<S, F>(speech: &mut S, max_unavailable: u32, mut dispatch: F) -> Result<()>
where
    S: Speech + ?Sized,
    F: FnMut(Capability) -> Result<()>,
{
    print_section_header(&format!("{}Voice Assistant Mode", MIC));
    speech.speak("Voice assistant ready. What would you like to do?");
    let mut unavailable = 0;

    loop {
        match speech.listen() {
            Heard::Silence => continue,
            Heard::Unavailable(reason) => {
                unavailable += 1;
                tracing::warn!(reason = %reason, attempt = unavailable, "speech unavailable");
                print_warning(&format!("Speech recognition unavailable: {}", reason));
                if unavailable >= max_unavailable {
                    speech.speak("Voice input is not working. Returning to the menu.");
                    return Ok(());
                }
                speech.speak("Sorry, I could not hear you. Please try again.");
            }
            Heard::Phrase(phrase) => {
                unavailable = 0;
                tracing::debug!(phrase = %phrase, "heard");
                match resolve_intent(&phrase) {
                    Intent::Exit => {
                        speech.speak("Goodbye!");
                        return Ok(());
                    }
                    Intent::Run(capability) => {
                        speech.speak(capability.announcement());
                        dispatch(capability)?;
                        speech.speak("Done. What next?");
                    }
                    Intent::Unknown => {
                        speech.speak("Sorry, I did not understand that command.");
                    }
                }
            }
        }
    }
}

/// Typed commands in, printed replies out
#[derive(Default)]
pub struct ConsoleSpeech {
    theme: ColorfulTheme,
}

impl Speech for ConsoleSpeech {
    fn speak(&mut self, text: &str) {
        print_assistant(text);
    }

    fn listen(&mut self) -> Heard {
        let typed = Input::<String>::with_theme(&self.theme)
            .with_prompt(format!("{}Command (e.g. merge pdf, exit)", MIC))
            .allow_empty(true)
            .interact_text();
        match typed {
            Ok(text) if text.trim().is_empty() => Heard::Silence,
            Ok(text) => Heard::Phrase(text),
            Err(err) => Heard::Unavailable(err.to_string()),
        }
    }
}

/// External text-to-speech and transcriber programs
///
/// Either side may be missing: replies are always printed, and without a
/// transcriber commands are typed as with [`ConsoleSpeech`].
#[derive(Default)]
pub struct CommandSpeech {
    say: Option<Vec<String>>,
    listen: Option<Vec<String>>,
    console: ConsoleSpeech,
}

fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

impl CommandSpeech {
    pub fn new(say_cmd: Option<&str>, listen_cmd: Option<&str>) -> Self {
        Self {
            say: say_cmd.map(split_command).filter(|c| !c.is_empty()),
            listen: listen_cmd.map(split_command).filter(|c| !c.is_empty()),
            console: ConsoleSpeech::default(),
        }
    }

    fn run(command: &[String], extra: Option<&str>) -> io::Result<std::process::Output> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;
        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(extra) = extra {
            cmd.arg(extra);
        }
        cmd.output()
    }
}

impl Speech for CommandSpeech {
    fn speak(&mut self, text: &str) {
        print_assistant(text);
        if let Some(say) = &self.say {
            if let Err(err) = Self::run(say, Some(text)) {
                tracing::debug!(error = %err, "text-to-speech failed");
            }
        }
    }

    fn listen(&mut self) -> Heard {
        let Some(listen) = &self.listen else {
            return self.console.listen();
        };
        println!("    {}Listening...", MIC);
        match Self::run(listen, None) {
            Ok(output) if output.status.success() => {
                let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if text.is_empty() {
                    Heard::Silence
                } else {
                    println!("    You said: {}", text);
                    Heard::Phrase(text)
                }
            }
            Ok(output) => Heard::Unavailable(format!("transcriber exited with {}", output.status)),
            Err(err) => Heard::Unavailable(err.to_string()),
        }
    }
}
