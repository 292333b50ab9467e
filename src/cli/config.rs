//! Session configuration assembled from CLI flags and the environment

use std::env;
use std::path::PathBuf;

use super::args::Cli;
use crate::pipeline::SelectionPolicy;
use crate::tools::email::MailSettings;

pub const PASSWORD_ENV: &str = "SMARTTERM_SENDER_PASSWORD";

/// External programs used by voice mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechSettings {
    pub say_cmd: Option<String>,
    pub listen_cmd: Option<String>,
    pub max_unavailable: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub start_dir: PathBuf,
    pub selection: SelectionPolicy,
    pub office_bin: String,
    /// `None` when the sender address or password is missing
    pub mail: Option<MailSettings>,
    pub speech: SpeechSettings,
    pub start_in_voice: bool,
}

impl Config {
    /// The sender password is only ever taken from the environment.
    pub fn from_cli(cli: &Cli) -> Self {
        Self::with_password(cli, env::var(PASSWORD_ENV).ok())
    }

    pub fn with_password(cli: &Cli, password: Option<String>) -> Self {
        let mail = match (&cli.sender_email, password) {
            (Some(sender), Some(password)) if !sender.is_empty() && !password.is_empty() => {
                Some(MailSettings {
                    server: cli.smtp_server.clone(),
                    port: cli.smtp_port,
                    sender: sender.clone(),
                    password,
                })
            }
            _ => None,
        };

        Self {
            start_dir: cli.dir.clone(),
            selection: if cli.strict_selection {
                SelectionPolicy::Strict
            } else {
                SelectionPolicy::FallbackToAll
            },
            office_bin: cli.office_bin.clone(),
            mail,
            speech: SpeechSettings {
                say_cmd: cli.say_cmd.clone(),
                listen_cmd: cli.listen_cmd.clone(),
                max_unavailable: cli.voice_retries,
            },
            start_in_voice: cli.voice,
        }
    }

    pub fn sender(&self) -> Option<&str> {
        self.mail.as_ref().map(|m| m.sender.as_str())
    }
}
