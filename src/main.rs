//! SmartTerm: Terminal Automation Assistant
//!
//! An interactive menu for everyday file chores: PDF merge, split,
//! protection and unlocking, Word and image conversion, folder sorting, CSV
//! reports and emailing files.

use anyhow::{Context, Result};
use clap::Parser;

use smartterm::cli::{run_menu, Cli, Commands, Config, Session, TerminalPrompter};
use smartterm::report::generate_report;
use smartterm::utils::{
    init_logging, print_banner, print_config, print_info, print_success, print_warning,
};

fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Ok(path) = &dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Report { dir } => run_report(dir),
        };
    }

    let config = Config::from_cli(&cli);
    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &config.start_dir,
        config.sender(),
        &config.office_bin,
        cli.strict_selection,
    );
    if config.mail.is_none() {
        print_info("Email is disabled until SMARTTERM_SENDER_EMAIL and SMARTTERM_SENDER_PASSWORD are set.");
    }

    let session = Session::new(config);
    let mut prompter = TerminalPrompter::new();
    run_menu(&session, &mut prompter).context("Menu input failed")
}

fn run_report(dir: &std::path::Path) -> Result<()> {
    match generate_report(dir)
        .with_context(|| format!("Failed to build report for {}", dir.display()))?
    {
        Some(path) => print_success(&format!("CSV report saved as {}", path.display())),
        None => print_warning(&format!("No files found in {}", dir.display())),
    }
    Ok(())
}
