//! Document format conversion through a headless office suite

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{sibling_path, ToolError};

/// Runs `<program> --headless --convert-to <format> --outdir <dir> <file>`.
#[derive(Debug, Clone)]
pub struct Office {
    program: String,
}

impl Office {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Convert `input` into `format`, writing next to it.
    ///
    /// An earlier conversion with the same name is replaced. Returns the path
    /// of the converted file.
    pub fn convert(&self, input: &Path, format: &str) -> Result<PathBuf, ToolError> {
        let destination = sibling_path(input, "", format);
        self.convert_to(input, format, &destination)?;
        Ok(destination)
    }

    /// Legacy `.doc` to `.docx`. Anything else is returned unchanged.
    ///
    /// An existing `.docx` of the same name is left alone and the conversion
    /// is refused.
    pub fn ensure_docx(&self, input: &Path) -> Result<PathBuf, ToolError> {
        match crate::pipeline::lowercase_extension(input).as_deref() {
            Some("doc") => {
                let destination = sibling_path(input, "", "docx");
                if destination.exists() {
                    return Err(ToolError::DestinationExists(destination));
                }
                self.convert_to(input, "docx", &destination)?;
                Ok(destination)
            }
            _ => Ok(input.to_path_buf()),
        }
    }

    /// `.doc` files are upgraded to `.docx` before PDF export.
    pub fn word_to_pdf(&self, input: &Path) -> Result<PathBuf, ToolError> {
        let docx = self.ensure_docx(input)?;
        self.convert(&docx, "pdf")
    }

    /// Run the converter into an empty staging folder, then move its result
    /// to `destination`.
    fn convert_to(&self, input: &Path, format: &str, destination: &Path) -> Result<(), ToolError> {
        let stem = input
            .file_stem()
            .ok_or_else(|| ToolError::Invalid(format!("{} has no file name", input.display())))?;
        let dir = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let staging = tempfile::Builder::new()
            .prefix(".smartterm-convert")
            .tempdir_in(dir)
            .map_err(|e| ToolError::io(dir, e))?;
        let mut produced = staging.path().join(stem);
        produced.set_extension(format);

        tracing::debug!(program = %self.program, input = %input.display(), format, "converting");
        let output = Command::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg(format)
            .arg("--outdir")
            .arg(staging.path())
            .arg(input)
            .output()
            .map_err(|e| self.failure(format!("could not start: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(format!("{} ({})", output.status, stderr.trim())));
        }
        if !produced.exists() {
            return Err(self.failure(format!("no output produced for {}", input.display())));
        }
        fs::rename(&produced, destination).map_err(|e| ToolError::io(destination, e))?;
        Ok(())
    }

    fn failure(&self, detail: String) -> ToolError {
        ToolError::External {
            program: self.program.clone(),
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_program_is_reported() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("letter.docx");
        std::fs::write(&input, b"x").unwrap();
        let office = Office::new("smartterm-no-such-office-binary");
        match office.convert(&input, "pdf") {
            Err(ToolError::External { program, .. }) => {
                assert_eq!(program, "smartterm-no-such-office-binary")
            }
            other => panic!("expected External error, got {:?}", other),
        }
    }

    #[test]
    fn test_doc_upgrade_keeps_existing_docx() {
        let dir = TempDir::new().unwrap();
        let legacy = dir.path().join("letter.doc");
        std::fs::write(&legacy, b"old").unwrap();
        let existing = dir.path().join("letter.docx");
        std::fs::write(&existing, b"keep me").unwrap();

        let office = Office::new("smartterm-no-such-office-binary");
        assert!(matches!(
            office.ensure_docx(&legacy),
            Err(ToolError::DestinationExists(path)) if path == existing
        ));
        assert_eq!(std::fs::read(&existing).unwrap(), b"keep me");
    }

    #[cfg(unix)]
    fn fake_office(dir: &Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("fake-office.sh");
        std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script.display().to_string()
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_output_does_not_hide_a_failed_conversion() {
        let tools = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("letter.docx");
        std::fs::write(&input, b"x").unwrap();
        let stale = dir.path().join("letter.pdf");
        std::fs::write(&stale, b"from last week").unwrap();

        let office = Office::new(fake_office(tools.path(), "exit 0"));
        assert!(matches!(
            office.convert(&input, "pdf"),
            Err(ToolError::External { .. })
        ));
        assert_eq!(std::fs::read(&stale).unwrap(), b"from last week");
    }

    #[cfg(unix)]
    #[test]
    fn test_fresh_output_replaces_previous_conversion() {
        let tools = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("letter.docx");
        std::fs::write(&input, b"x").unwrap();
        std::fs::write(dir.path().join("letter.pdf"), b"old").unwrap();

        let office = Office::new(fake_office(
            tools.path(),
            r#"name=$(basename "$6"); printf converted > "$5/${name%.*}.$3""#,
        ));
        let output = office.convert(&input, "pdf").unwrap();

        assert_eq!(output, dir.path().join("letter.pdf"));
        assert_eq!(std::fs::read(&output).unwrap(), b"converted");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 2, "Staging folder is removed");
    }

    #[test]
    fn test_docx_needs_no_upgrade() {
        let office = Office::new("unused");
        let path = Path::new("/tmp/letter.docx");
        assert_eq!(office.ensure_docx(path).unwrap(), path);
    }
}
