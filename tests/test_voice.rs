//! Tests for the voice assistant loop

use std::collections::VecDeque;

use smartterm::cli::voice::*;

struct Scripted {
    heard: VecDeque<Heard>,
    said: Vec<String>,
}

impl Scripted {
    fn new(heard: Vec<Heard>) -> Self {
        Self {
            heard: heard.into(),
            said: Vec::new(),
        }
    }
}

impl Speech for Scripted {
    fn speak(&mut self, text: &str) {
        self.said.push(text.to_string());
    }

    fn listen(&mut self) -> Heard {
        self.heard
            .pop_front()
            .unwrap_or_else(|| Heard::Phrase("exit".to_string()))
    }
}

fn phrase(text: &str) -> Heard {
    Heard::Phrase(text.to_string())
}

#[test]
fn test_dispatches_recognized_commands_in_order() {
    let mut speech = Scripted::new(vec![
        phrase("merge pdf"),
        Heard::Silence,
        phrase("please convert word"),
        phrase("sing a song"),
        phrase("exit"),
    ]);
    let mut dispatched = Vec::new();

    run_voice(&mut speech, 3, |capability| {
        dispatched.push(capability);
        Ok(())
    })
    .unwrap();

    assert_eq!(
        dispatched,
        vec![Capability::MergePdf, Capability::WordToPdf]
    );
    assert!(speech.said.contains(&Capability::MergePdf.announcement().to_string()));
    assert!(speech
        .said
        .iter()
        .any(|s| s.contains("did not understand")));
    assert_eq!(speech.said.last().unwrap(), "Goodbye!");
}

#[test]
fn test_gives_up_after_repeated_unavailability() {
    let unavailable = || Heard::Unavailable("no microphone".to_string());
    let mut speech = Scripted::new(vec![
        unavailable(),
        unavailable(),
        unavailable(),
        phrase("merge pdf"),
    ]);
    let mut dispatched = 0;

    run_voice(&mut speech, 3, |_| {
        dispatched += 1;
        Ok(())
    })
    .unwrap();

    assert_eq!(dispatched, 0);
    assert_eq!(speech.heard.len(), 1, "Stopped listening after three failures");
}

#[test]
fn test_a_recognized_phrase_resets_the_failure_count() {
    let unavailable = || Heard::Unavailable("busy".to_string());
    let mut speech = Scripted::new(vec![
        unavailable(),
        unavailable(),
        phrase("split pdf"),
        unavailable(),
        unavailable(),
        phrase("quit"),
    ]);
    let mut dispatched = Vec::new();

    run_voice(&mut speech, 3, |capability| {
        dispatched.push(capability);
        Ok(())
    })
    .unwrap();

    assert_eq!(dispatched, vec![Capability::SplitPdf]);
    assert!(speech.heard.is_empty());
}

#[test]
fn test_intent_table() {
    assert_eq!(resolve_intent("protect pdf"), Intent::Run(Capability::ProtectPdf));
    assert_eq!(resolve_intent("word to pdf"), Intent::Run(Capability::WordToPdf));
    assert_eq!(resolve_intent("pdf"), Intent::Unknown);
}

#[test]
fn test_plural_commands_are_recognized() {
    assert_eq!(resolve_intent("merge pdfs"), Intent::Run(Capability::MergePdf));
    assert_eq!(resolve_intent("Merge PDFs please"), Intent::Run(Capability::MergePdf));
    assert_eq!(resolve_intent("split pdfs"), Intent::Run(Capability::SplitPdf));
    assert_eq!(resolve_intent("protect pdfs"), Intent::Run(Capability::ProtectPdf));
    assert_eq!(resolve_intent("convert words"), Intent::Run(Capability::WordToPdf));
}
