//! Terminal styling utilities for the menus and per-item output

use console::{style, Emoji};
use std::path::Path;

use crate::report::{display_name, Outcome};

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[x] ");
pub static WAVE: Emoji<'_, '_> = Emoji("👋 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static MAIL: Emoji<'_, '_> = Emoji("📧 ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("🛠️  ", "");
pub static LOCK: Emoji<'_, '_> = Emoji("🔐 ", "");
pub static MIC: Emoji<'_, '_> = Emoji("🎙️  ", "");
pub static ROBOT: Emoji<'_, '_> = Emoji("🤖 ", "> ");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("💻").cyan(),
        style("Smart Terminal Automation Assistant").cyan().bold()
    );
    println!(
        "    {}",
        style("PDF, Word, image, organizer and email chores from one menu").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the session configuration card
pub fn print_config(
    start_dir: &Path,
    sender: Option<&str>,
    office_bin: &str,
    strict_selection: bool,
) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Session").cyan().bold(),
        " ".repeat(box_width - 14)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Folder:    {:<36}│",
        FOLDER,
        truncate_path(start_dir, 35)
    );
    println!(
        "    │  {} Sender:    {:<36}│",
        MAIL,
        truncate_string(sender.unwrap_or("(not configured)"), 35)
    );
    println!(
        "    │  {} Office:    {:<36}│",
        GEAR,
        truncate_string(office_bin, 35)
    );
    println!(
        "    │  {} Selection: {:<36}│",
        LOCK,
        if strict_selection {
            style("strict").yellow()
        } else {
            style("fallback to all").yellow()
        }
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a section header with styling
pub fn print_section_header(title: &str) {
    println!();
    println!(
        "    {} {}",
        style("│").cyan().bold(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {}{}", WARN, style(message).yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    println!("    {}{}", CROSS, style(message).red());
}

/// Print a reply from the voice assistant
pub fn print_assistant(message: &str) {
    println!("    {}{}", ROBOT, style(message).cyan().bold());
}

pub fn print_goodbye() {
    println!();
    println!("    {}{}", WAVE, style("Goodbye!").cyan().bold());
    println!();
}

/// Print a numbered listing of candidates
pub fn print_listing(description: &str, items: &[impl AsRef<Path>]) {
    println!();
    println!(
        "    {}{}",
        FOLDER,
        style(format!("Select {}(s) to process:", description))
            .cyan()
            .bold()
    );
    for (i, item) in items.iter().enumerate() {
        println!(
            "      {} {}",
            style(format!("{:>3}.", i + 1)).dim(),
            display_name(item.as_ref())
        );
    }
    println!();
    println!("    {}", style("Example: 1,3,5 or 2-6 or all").dim());
}

/// Print the outcome line for a single processed item
pub fn print_item_outcome(item: &Path, outcome: &Outcome) {
    let name = display_name(item);
    match outcome {
        Outcome::Succeeded { output: Some(out) } if out != item => {
            print_success(&format!("{} → {}", name, display_name(out)))
        }
        Outcome::Succeeded { .. } => print_success(&name),
        Outcome::Skipped { reason } => print_warning(&format!("{} skipped: {}", name, reason)),
        Outcome::Failed { reason } => print_error(&format!("{}: {}", name, reason)),
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(count - max_len + 3).collect();
        format!("...{}", tail)
    }
}
