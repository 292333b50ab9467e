//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

use docx_rs::{Docx, Paragraph, Run};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use smartterm::cli::Prompter;
use tempfile::TempDir;

/// Prompter answering from a fixed script, in order.
///
/// Text prompts take the next queued answer (an empty answer means "use the
/// default"); menu prompts take the next queued index.
#[derive(Default)]
pub struct ScriptedPrompter {
    pub answers: VecDeque<String>,
    pub choices: VecDeque<usize>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_choices(mut self, choices: &[usize]) -> Self {
        self.choices = choices.iter().copied().collect();
        self
    }

    fn next_answer(&mut self, prompt: &str) -> io::Result<String> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, format!("no answer for '{}'", prompt))
        })
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> io::Result<String> {
        let answer = self.next_answer(prompt)?;
        match default {
            Some(default) if answer.is_empty() => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    fn secret(&mut self, prompt: &str, _confirm: bool) -> io::Result<String> {
        self.next_answer(prompt)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<bool> {
        let answer = self.next_answer(prompt)?;
        Ok(match answer.as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        })
    }

    fn choose(&mut self, title: &str, _items: &[&str]) -> io::Result<usize> {
        self.asked.push(title.to_string());
        self.choices.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, format!("no choice for '{}'", title))
        })
    }
}

/// Build a PDF whose pages each carry a `Label` entry, so page order can be
/// checked after merging or splitting.
pub fn labelled_pdf(labels: &[String]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for label in labels {
        let content = Content {
            operations: vec![Operation::new("BT", vec![]), Operation::new("ET", vec![])],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(595), Object::Integer(842)],
            "Label" => Object::string_literal(label.as_str()),
        });
        kids.push(Object::Reference(page_id));
    }
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Write a PDF with pages labelled `<prefix>1 .. <prefix><pages>`.
pub fn write_pdf(dir: &Path, name: &str, prefix: &str, pages: usize) -> PathBuf {
    let labels: Vec<String> = (1..=pages).map(|i| format!("{}{}", prefix, i)).collect();
    let path = dir.join(name);
    labelled_pdf(&labels).save(&path).unwrap();
    path
}

/// Page labels of a PDF on disk, in page order.
pub fn page_labels(path: &Path) -> Vec<String> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| match doc.get_dictionary(id).unwrap().get(b"Label").unwrap() {
            Object::String(bytes, _) => String::from_utf8_lossy(bytes).into_owned(),
            other => panic!("unexpected label {:?}", other),
        })
        .collect()
}

/// Write a `.docx` with one paragraph per entry of `texts`.
pub fn write_docx(dir: &Path, name: &str, texts: &[&str]) -> PathBuf {
    let mut docx = Docx::new();
    for text in texts {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
    }
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    docx.build().pack(file).unwrap();
    path
}

/// Count the paragraphs of a `.docx` on disk.
pub fn paragraph_count(path: &Path) -> usize {
    let docx = smartterm::tools::word::load(path).unwrap();
    docx.document
        .children
        .iter()
        .filter(|c| matches!(c, docx_rs::DocumentChild::Paragraph(_)))
        .count()
}

/// Create a temporary directory holding the named files with small contents.
pub fn temp_dir_with_files(names: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in names {
        std::fs::write(dir.path().join(name), name.as_bytes()).unwrap();
    }
    dir
}
