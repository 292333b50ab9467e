//! CLI module - arguments, session configuration, prompts, menus and voice mode

pub mod actions;
mod args;
mod config;
pub mod menu;
mod prompts;
pub mod voice;

pub use actions::{run_action, Action, Outbox, Session};
pub use args::{Cli, Commands};
pub use config::{Config, SpeechSettings, PASSWORD_ENV};
pub use menu::run_menu;
pub use prompts::*;
