//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SmartTerm - PDF, Word, image, file-organizing and email chores from one menu
#[derive(Parser, Debug)]
#[command(name = "smartterm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Folder offered as the default answer to path prompts
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Treat an invalid selection as an error instead of selecting everything
    #[arg(long, default_value = "false")]
    pub strict_selection: bool,

    /// Start in voice assistant mode instead of the main menu
    #[arg(long, default_value = "false")]
    pub voice: bool,

    /// Office suite used for Word conversions (run headless)
    #[arg(long, env = "SMARTTERM_OFFICE_BIN", default_value = "libreoffice")]
    pub office_bin: String,

    /// Text-to-speech command; the reply is passed as its last argument.
    /// Without it, replies are only printed.
    #[arg(long, env = "SMARTTERM_SAY_CMD")]
    pub say_cmd: Option<String>,

    /// Speech-to-text command; its stdout is taken as the heard phrase.
    /// Without it, voice commands are typed.
    #[arg(long, env = "SMARTTERM_LISTEN_CMD")]
    pub listen_cmd: Option<String>,

    /// Consecutive failed listens before voice mode returns to the menu
    #[arg(long, default_value = "3", value_parser = validate_retries)]
    pub voice_retries: u32,

    /// SMTP server for the email tool
    #[arg(long, env = "SMARTTERM_SMTP_SERVER", default_value = "smtp.gmail.com")]
    pub smtp_server: String,

    /// SMTP port (STARTTLS)
    #[arg(long, env = "SMARTTERM_SMTP_PORT", default_value = "587")]
    pub smtp_port: u16,

    /// Sender address; the password is read from SMARTTERM_SENDER_PASSWORD
    #[arg(long, env = "SMARTTERM_SENDER_EMAIL")]
    pub sender_email: Option<String>,

    /// Increase diagnostic logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write file_report.csv for a folder without opening the menu
    Report {
        /// Folder to summarize
        dir: PathBuf,
    },
}

/// Validator for voice_retries parameter
fn validate_retries(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value == 0 {
        Err("voice_retries must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["smartterm"]).unwrap();
        assert_eq!(cli.dir, PathBuf::from("."));
        assert!(!cli.strict_selection);
        assert_eq!(cli.voice_retries, 3);
        assert_eq!(cli.verbose, 0);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::try_parse_from(["smartterm", "-vv", "--strict-selection"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.strict_selection);
    }

    #[test]
    fn test_zero_retries_rejected() {
        assert!(Cli::try_parse_from(["smartterm", "--voice-retries", "0"]).is_err());
    }

    #[test]
    fn test_report_subcommand() {
        let cli = Cli::try_parse_from(["smartterm", "report", "/tmp/docs"]).unwrap();
        match cli.command {
            Some(Commands::Report { dir }) => assert_eq!(dir, PathBuf::from("/tmp/docs")),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
