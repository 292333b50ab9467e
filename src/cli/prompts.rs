//! Interactive prompts using dialoguer
//!
//! Actions talk to the user through [`Prompter`] so they can be driven by
//! scripted answers in tests.

use std::io;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};

use crate::pipeline::Chooser;

pub trait Prompter {
    /// Free-text answer; an empty reply yields `default` when given.
    fn input(&mut self, prompt: &str, default: Option<&str>) -> io::Result<String>;

    /// Hidden answer, asked twice when `confirm` is set.
    fn secret(&mut self, prompt: &str, confirm: bool) -> io::Result<String>;

    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<bool>;

    /// Index into `items` of the chosen entry.
    fn choose(&mut self, title: &str, items: &[&str]) -> io::Result<usize>;

    /// Wait for the user before redrawing a menu.
    fn pause(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<P: Prompter + ?Sized> Chooser for P {
    fn ask_selection(&mut self, prompt: &str, default: &str) -> io::Result<String> {
        self.input(prompt, Some(default))
    }
}

fn to_io(err: dialoguer::Error) -> io::Error {
    match err {
        dialoguer::Error::IO(e) => e,
    }
}

/// Prompter backed by the real terminal
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> io::Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input.interact_text().map(|s| s.trim().to_string()).map_err(to_io)
    }

    fn secret(&mut self, prompt: &str, confirm: bool) -> io::Result<String> {
        let mut password = Password::with_theme(&self.theme).with_prompt(prompt);
        if confirm {
            password = password.with_confirmation("Confirm password", "Passwords do not match");
        }
        password.interact().map_err(to_io)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(to_io)
    }

    fn choose(&mut self, title: &str, items: &[&str]) -> io::Result<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(title)
            .items(items)
            .default(0)
            .interact()
            .map_err(to_io)
    }

    fn pause(&mut self) -> io::Result<()> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt("Press Enter to return to the menu")
            .allow_empty(true)
            .interact_text()
            .map(|_| ())
            .map_err(to_io)
    }
}
