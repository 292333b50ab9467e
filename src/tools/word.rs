//! Merge and split `.docx` documents with docx-rs

use std::fs;
use std::path::{Path, PathBuf};

use docx_rs::{read_docx, DocumentChild, Docx};

use super::{write_atomically, ToolError};
use crate::pipeline::Assembled;

pub const MERGED_FILE_NAME: &str = "merged.docx";

pub fn load(path: &Path) -> Result<Docx, ToolError> {
    let bytes = fs::read(path).map_err(|e| ToolError::io(path, e))?;
    read_docx(&bytes).map_err(|e| ToolError::Word(format!("{}: {}", path.display(), e)))
}

pub fn save(docx: Docx, output: &Path) -> Result<(), ToolError> {
    write_atomically(output, |file| {
        docx.build()
            .pack(file)
            .map_err(|e| ToolError::Word(format!("{}: {}", output.display(), e)))
    })
}

/// Append the body of every input to the first readable one.
///
/// Styles and section settings come from the first document. Embedded
/// relationships of later documents are not carried over.
pub fn merge_docx(inputs: &[PathBuf], output: &Path) -> Result<Assembled, ToolError> {
    let mut merged: Option<Docx> = None;
    let mut assembled = Assembled::default();

    for input in inputs {
        let docx = match load(input) {
            Ok(docx) => docx,
            Err(err) => {
                tracing::warn!(input = %input.display(), error = %err, "skipping document");
                assembled.rejected.push((input.clone(), err.to_string()));
                continue;
            }
        };
        match merged.as_mut() {
            Some(base) => base.document.children.extend(docx.document.children),
            None => merged = Some(docx),
        }
        assembled.included.push(input.clone());
    }

    let Some(merged) = merged else {
        return Ok(assembled);
    };
    save(merged, output)?;
    assembled.output = Some(output.to_path_buf());
    Ok(assembled)
}

fn is_paragraph(child: &DocumentChild) -> bool {
    matches!(child, DocumentChild::Paragraph(_))
}

/// Split a body into parts holding at most `per_part` paragraphs each.
///
/// Tables and other non-paragraph blocks stay with the paragraphs before
/// them.
pub fn chunk_children(
    children: Vec<DocumentChild>,
    per_part: usize,
) -> Vec<Vec<DocumentChild>> {
    let per_part = per_part.max(1);
    let mut parts: Vec<Vec<DocumentChild>> = Vec::new();
    let mut current = Vec::new();
    let mut paragraphs = 0;

    for child in children {
        if is_paragraph(&child) {
            if paragraphs == per_part {
                parts.push(std::mem::take(&mut current));
                paragraphs = 0;
            }
            paragraphs += 1;
        }
        current.push(child);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Write `<stem>_split/<stem>_part<i>.docx` for each chunk of `input`.
///
/// Returns the folder holding the parts, or `None` when the document has no
/// paragraphs.
pub fn split_docx(input: &Path, per_part: usize) -> Result<Option<(PathBuf, usize)>, ToolError> {
    if per_part == 0 {
        return Err(ToolError::Invalid(
            "paragraphs per part must be at least 1".to_string(),
        ));
    }
    let mut docx = load(input)?;
    let children = std::mem::take(&mut docx.document.children);
    if !children.iter().any(is_paragraph) {
        return Ok(None);
    }

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let out_dir = parent.join(format!("{}_split", stem));
    fs::create_dir_all(&out_dir).map_err(|e| ToolError::io(&out_dir, e))?;

    let parts = chunk_children(children, per_part);
    let total = parts.len();
    for (index, part) in parts.into_iter().enumerate() {
        let mut piece = docx.clone();
        piece.document.children = part;
        let path = out_dir.join(format!("{}_part{}.docx", stem, index + 1));
        save(piece, &path)?;
    }
    tracing::info!(input = %input.display(), parts = total, "document split");
    Ok(Some((out_dir, total)))
}
