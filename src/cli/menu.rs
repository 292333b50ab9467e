//! Main menu loop and submenus

use anyhow::Result;

use super::actions::{run_action, Action, Session};
use super::prompts::Prompter;
use super::voice::{run_voice, Capability, CommandSpeech};
use crate::utils::{print_error, print_goodbye, print_section_header};

const MAIN_MENU: [&str; 5] = [
    "PDF & Word Tools",
    "File Organizer",
    "Email & Report Generator",
    "Voice Assistant Mode",
    "Exit",
];

pub fn action_for(capability: Capability) -> Action {
    match capability {
        Capability::MergePdf => Action::MergePdfs,
        Capability::SplitPdf => Action::SplitPdf,
        Capability::ProtectPdf => Action::ProtectPdf,
        Capability::UnlockPdf => Action::UnlockPdf,
        Capability::WordToPdf => Action::WordToPdf,
        Capability::ImageToPdf => Action::ImageToPdf,
    }
}

/// Run an action and show its summary. Failures are printed, not returned.
pub fn perform(action: Action, session: &Session, prompter: &mut dyn Prompter) {
    print_section_header(action.title());
    match run_action(action, session, prompter) {
        Ok(Some(report)) => report.display(),
        Ok(None) => {}
        Err(err) => {
            tracing::error!(action = action.title(), error = %format!("{:#}", err), "action failed");
            print_error(&format!("{:#}", err));
        }
    }
}

/// Returns `false` when the user chose Exit.
fn main_menu_round(session: &Session, prompter: &mut dyn Prompter) -> Result<bool> {
    print_section_header("Main Menu");
    let choice = prompter.choose("Choose an option", &MAIN_MENU)?;
    let actions: &[Action] = match choice {
        0 => &Action::DOCUMENT_TOOLS,
        1 => &Action::ORGANIZER,
        2 => &Action::EMAIL_AND_REPORTS,
        3 => {
            voice_mode(session, prompter)?;
            return Ok(true);
        }
        _ => return Ok(false),
    };

    let mut items: Vec<&str> = actions.iter().map(Action::title).collect();
    items.push("Back");
    let picked = prompter.choose(MAIN_MENU[choice], &items)?;
    if let Some(&action) = actions.get(picked) {
        perform(action, session, prompter);
        prompter.pause()?;
    }
    Ok(true)
}

/// Voice loop; dispatched actions use the regular prompts for their details.
pub fn voice_mode(session: &Session, prompter: &mut dyn Prompter) -> Result<()> {
    let speech = &session.config.speech;
    let mut listener = CommandSpeech::new(speech.say_cmd.as_deref(), speech.listen_cmd.as_deref());
    run_voice(&mut listener, speech.max_unavailable, |capability| {
        perform(action_for(capability), session, prompter);
        Ok(())
    })
}

/// Show the main menu until the user exits.
pub fn run_menu(session: &Session, prompter: &mut dyn Prompter) -> Result<()> {
    if session.config.start_in_voice {
        voice_mode(session, prompter)?;
    }
    while main_menu_round(session, prompter)? {}
    print_goodbye();
    Ok(())
}
