//! Image to PDF conversion
//!
//! Each image becomes one page sized to the image's pixel dimensions, with the
//! pixels embedded as an uncompressed RGB XObject that lopdf then deflates.

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::{write_atomically, ToolError};
use crate::pipeline::Assembled;

/// Convert one image into a single-page PDF.
pub fn image_to_pdf(input: &Path, output: &Path) -> Result<(), ToolError> {
    let mut builder = PageBuilder::new();
    builder.add_image(input)?;
    builder.finish(output)
}

/// Combine `inputs` into one PDF, one page per image, in order.
///
/// Images that cannot be decoded are reported as rejected. Nothing is written
/// when none of them could be decoded.
pub fn images_to_pdf(inputs: &[PathBuf], output: &Path) -> Result<Assembled, ToolError> {
    let mut builder = PageBuilder::new();
    let mut assembled = Assembled::default();

    for input in inputs {
        match builder.add_image(input) {
            Ok(()) => assembled.included.push(input.clone()),
            Err(err) => {
                tracing::warn!(input = %input.display(), error = %err, "skipping image");
                assembled.rejected.push((input.clone(), err.to_string()));
            }
        }
    }

    if assembled.included.is_empty() {
        return Ok(assembled);
    }
    builder.finish(output)?;
    assembled.output = Some(output.to_path_buf());
    Ok(assembled)
}

struct PageBuilder {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl PageBuilder {
    fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    fn add_image(&mut self, path: &Path) -> Result<(), ToolError> {
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        let image_id = self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            rgb.into_raw(),
        ));

        let w = width as f32;
        let h = height as f32;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![w.into(), 0.into(), 0.into(), h.into(), 0.into(), 0.into()],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content.encode()?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), w.into(), h.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
        });
        self.kids.push(Object::Reference(page_id));
        Ok(())
    }

    fn finish(mut self, output: &Path) -> Result<(), ToolError> {
        let count = self.kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let doc = &mut self.doc;
        write_atomically(output, |file| {
            doc.save_to(file).map_err(|e| {
                ToolError::Invalid(format!("failed to write {}: {}", output.display(), e))
            })
        })
    }
}
