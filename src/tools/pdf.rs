//! PDF page assembly, protection and unlocking using lopdf
//!
//! Merging and splitting share one routine: every source document is
//! renumbered into a common object space, then a fresh page tree is built
//! from the requested pages. Attributes a page inherits from its original
//! page tree are copied onto the page so nothing is lost when that tree is
//! dropped.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashSet};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, StringFormat};
use lopdf::{EncryptionState, EncryptionVersion, Permissions};

use super::{write_atomically, ToolError};
use crate::pipeline::Assembled;

const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];
const MAX_TREE_DEPTH: usize = 64;

/// Open a PDF that is not password protected.
pub fn load(path: &Path) -> Result<Document, ToolError> {
    let doc = Document::load(path)?;
    if doc.is_encrypted() {
        return Err(ToolError::Encrypted);
    }
    Ok(doc)
}

pub fn page_count(path: &Path) -> Result<usize, ToolError> {
    Ok(load(path)?.get_pages().len())
}

/// Build a new document from `(source, page numbers)` pairs, in order.
///
/// Page numbers are 1-based. A page requested twice is only included once.
pub fn assemble(sources: Vec<(Document, Vec<u32>)>) -> Result<Document, ToolError> {
    let mut output = Document::with_version("1.5");
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut wanted: Vec<ObjectId> = Vec::new();
    let mut next_id = 1;

    for (mut doc, numbers) in sources {
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;

        let pages = doc.get_pages();
        for &page_id in pages.values() {
            flatten_inherited(&mut doc, page_id);
        }
        for number in numbers {
            let page_id = pages.get(&number).copied().ok_or_else(|| {
                ToolError::Invalid(format!(
                    "page {} does not exist (document has {} pages)",
                    number,
                    pages.len()
                ))
            })?;
            wanted.push(page_id);
        }

        for (id, object) in doc.objects {
            let page_tree_node = matches!(
                object.type_name(),
                Ok(b"Catalog" | b"Pages" | b"Outlines" | b"Outline")
            );
            if !page_tree_node {
                objects.insert(id, object);
            }
        }
    }

    output.objects = objects;
    output.max_id = next_id.saturating_sub(1);
    let pages_id = output.new_object_id();

    let mut seen = HashSet::new();
    let mut kids = Vec::new();
    for page_id in wanted {
        if !seen.insert(page_id) {
            continue;
        }
        if let Ok(page) = output
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
        {
            page.set("Parent", pages_id);
        }
        kids.push(Object::Reference(page_id));
    }
    if kids.is_empty() {
        return Err(ToolError::Invalid("no pages to write".to_string()));
    }

    let count = kids.len() as i64;
    output.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = output.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    output.trailer.set("Root", catalog_id);
    output.prune_objects();
    Ok(output)
}

/// Merge every page of `inputs`, in order, into `output`.
///
/// Unreadable inputs are reported as rejected and left out; the output is
/// only written when at least one input was readable, otherwise the result
/// carries no output and every input is rejected.
pub fn merge_pdfs(inputs: &[PathBuf], output: &Path) -> Result<Assembled, ToolError> {
    let mut sources = Vec::new();
    let mut assembled = Assembled::default();

    for input in inputs {
        match load(input) {
            Ok(doc) => {
                let numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
                sources.push((doc, numbers));
                assembled.included.push(input.clone());
            }
            Err(err) => {
                tracing::warn!(input = %input.display(), error = %err, "skipping unreadable PDF");
                assembled.rejected.push((input.clone(), err.to_string()));
            }
        }
    }

    if sources.is_empty() {
        return Ok(assembled);
    }

    let mut merged = assemble(sources)?;
    merged.compress();
    save(&mut merged, output)?;
    assembled.output = Some(output.to_path_buf());
    Ok(assembled)
}

/// Copy the given 1-based `pages` of `input` into `output`, in that order.
///
/// Returns the number of pages written.
pub fn split_pdf(input: &Path, pages: &[u32], output: &Path) -> Result<usize, ToolError> {
    let doc = load(input)?;
    let mut extracted = assemble(vec![(doc, pages.to_vec())])?;
    let written = extracted.get_pages().len();
    extracted.compress();
    save(&mut extracted, output)?;
    Ok(written)
}

/// Write a copy of `input` encrypted with `password` to `output`.
pub fn protect_pdf(input: &Path, password: &str, output: &Path) -> Result<(), ToolError> {
    if password.is_empty() {
        return Err(ToolError::Invalid("password must not be empty".to_string()));
    }
    let mut doc = load(input)?;
    ensure_document_id(&mut doc, input);
    // Streams must be deflated before encryption, never after.
    doc.compress();

    let version = EncryptionVersion::V2 {
        document: &doc,
        owner_password: password,
        user_password: password,
        key_length: 128,
        permissions: Permissions::all(),
    };
    let state =
        EncryptionState::try_from(version).map_err(|e| ToolError::Encryption(e.to_string()))?;
    doc.encrypt(&state)
        .map_err(|e| ToolError::Encryption(e.to_string()))?;

    save(&mut doc, output)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockStatus {
    NotEncrypted,
    Unlocked,
}

/// Decrypt `input` with `password` and write an unprotected copy to `output`.
pub fn unlock_pdf(input: &Path, password: &str, output: &Path) -> Result<UnlockStatus, ToolError> {
    let mut doc = Document::load(input)?;
    if !doc.is_encrypted() {
        return Ok(UnlockStatus::NotEncrypted);
    }

    doc.decrypt(password).map_err(|err| {
        tracing::debug!(input = %input.display(), error = %err, "decryption rejected");
        ToolError::WrongPassword
    })?;
    if doc.get_pages().is_empty() {
        return Err(ToolError::WrongPassword);
    }
    doc.trailer.remove(b"Encrypt");
    doc.compress();

    save(&mut doc, output)?;
    Ok(UnlockStatus::Unlocked)
}

fn save(doc: &mut Document, output: &Path) -> Result<(), ToolError> {
    write_atomically(output, |file| {
        doc.save_to(file)
            .map_err(|e| ToolError::Invalid(format!("failed to write {}: {}", output.display(), e)))
    })
}

/// Copy inherited page attributes down onto the page itself.
fn flatten_inherited(doc: &mut Document, page_id: ObjectId) {
    let inherited: Vec<(&[u8], Object)> = match doc.get_dictionary(page_id) {
        Ok(page) => INHERITABLE
            .iter()
            .filter(|key| !page.has(key))
            .filter_map(|key| inherited_attribute(doc, page, key).map(|value| (*key, value)))
            .collect(),
        Err(_) => return,
    };

    if let Ok(page) = doc.get_object_mut(page_id).and_then(Object::as_dict_mut) {
        for (key, value) in inherited {
            page.set(key, value);
        }
    }
}

fn inherited_attribute(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(id) = parent {
        let node = doc.get_dictionary(id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            break;
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// Encryption keys are derived from the trailer ID, so make sure there is one.
fn ensure_document_id(doc: &mut Document, source: &Path) {
    if doc.trailer.has(b"ID") {
        return;
    }
    let mut bytes = Vec::with_capacity(16);
    for salt in 0u8..2 {
        let mut hasher = DefaultHasher::new();
        source.hash(&mut hasher);
        chrono::Utc::now().timestamp_micros().hash(&mut hasher);
        salt.hash(&mut hasher);
        bytes.extend_from_slice(&hasher.finish().to_be_bytes());
    }
    let id = Object::String(bytes, StringFormat::Hexadecimal);
    doc.trailer.set("ID", vec![id.clone(), id]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::Stream;
    use tempfile::TempDir;

    /// A document whose pages carry a `Label` entry, with MediaBox and
    /// Resources only on the page tree root.
    fn labelled(labels: &[&str]) -> Document {
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
                "Label" => Object::string_literal(*label),
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
                "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(595), Object::Integer(842)],
                "Resources" => dictionary! {},
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    fn labels_of(doc: &Document) -> Vec<String> {
        doc.get_pages()
            .values()
            .map(|&id| {
                let page = doc.get_dictionary(id).unwrap();
                match page.get(b"Label").unwrap() {
                    Object::String(bytes, _) => String::from_utf8_lossy(bytes).into_owned(),
                    other => panic!("unexpected label {:?}", other),
                }
            })
            .collect()
    }

    #[test]
    fn test_assemble_keeps_requested_order() {
        let doc = assemble(vec![(labelled(&["1", "2", "3", "4"]), vec![4, 1, 2])]).unwrap();
        assert_eq!(labels_of(&doc), vec!["4", "1", "2"]);
    }

    #[test]
    fn test_assemble_drops_repeated_pages() {
        let doc = assemble(vec![(labelled(&["1", "2"]), vec![1, 1, 2])]).unwrap();
        assert_eq!(labels_of(&doc), vec!["1", "2"]);
    }

    #[test]
    fn test_assemble_copies_inherited_attributes() {
        let doc = assemble(vec![(labelled(&["1"]), vec![1])]).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        assert!(page.has(b"MediaBox"));
        assert!(page.has(b"Resources"));
    }

    #[test]
    fn test_assemble_rejects_missing_page() {
        let result = assemble(vec![(labelled(&["1"]), vec![3])]);
        assert!(matches!(result, Err(ToolError::Invalid(_))));
    }

    #[test]
    fn test_merge_skips_unreadable_inputs() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.pdf");
        labelled(&["a", "b"]).save(&good).unwrap();
        let bad = dir.path().join("bad.pdf");
        std::fs::write(&bad, b"not a pdf").unwrap();
        let out = dir.path().join("merged.pdf");

        let assembled = merge_pdfs(&[good.clone(), bad.clone()], &out).unwrap();
        assert_eq!(assembled.included, vec![good]);
        assert_eq!(assembled.rejected.len(), 1);
        assert_eq!(page_count(&out).unwrap(), 2);
    }

    #[test]
    fn test_merge_with_nothing_readable_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("bad.pdf");
        std::fs::write(&bad, b"garbage").unwrap();
        let out = dir.path().join("merged.pdf");
        let assembled = merge_pdfs(&[bad.clone()], &out).unwrap();
        assert_eq!(assembled.output, None);
        assert_eq!(assembled.rejected[0].0, bad);
        assert!(!out.exists());
    }

    #[test]
    fn test_unlock_reports_plain_documents() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("plain.pdf");
        labelled(&["a"]).save(&plain).unwrap();
        let out = dir.path().join("plain_unlocked.pdf");
        assert_eq!(
            unlock_pdf(&plain, "secret", &out).unwrap(),
            UnlockStatus::NotEncrypted
        );
        assert!(!out.exists());
    }

    #[test]
    fn test_protect_rejects_empty_password() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("plain.pdf");
        labelled(&["a"]).save(&plain).unwrap();
        let out = dir.path().join("plain_protected.pdf");
        assert!(matches!(
            protect_pdf(&plain, "", &out),
            Err(ToolError::Invalid(_))
        ));
    }
}
