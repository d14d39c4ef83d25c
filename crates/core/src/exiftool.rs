use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("could not launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} failed on {path} ({status}): {stderr}")]
    Failed {
        program: String,
        path: PathBuf,
        status: String,
        stderr: String,
    },
}

/// Writes the creation, modification and original-capture dates of a file.
pub trait MetadataWriter {
    /// `datetime` is `YYYY:MM:DD HH:MM:SS`.
    fn write_dates(&self, path: &Path, datetime: &str) -> Result<(), MetadataError>;

    /// Human readable form of the call, used in dry-run logs.
    fn describe(&self, path: &Path, datetime: &str) -> String;
}

/// Runs the `exiftool` executable once per file and waits for it.
#[derive(Debug, Clone)]
pub struct ExifTool {
    program: String,
}

impl Default for ExifTool {
    fn default() -> Self {
        Self::new("exiftool")
    }
}

impl ExifTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(datetime: &str) -> [String; 4] {
        [
            "-overwrite_original".to_string(),
            format!("-DateTimeOriginal={datetime}"),
            format!("-CreateDate={datetime}"),
            format!("-ModifyDate={datetime}"),
        ]
    }
}

impl MetadataWriter for ExifTool {
    fn write_dates(&self, path: &Path, datetime: &str) -> Result<(), MetadataError> {
        let output = Command::new(&self.program)
            .args(Self::args(datetime))
            .arg(path)
            .output()
            .map_err(|source| MetadataError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        Err(MetadataError::Failed {
            program: self.program.clone(),
            path: path.to_path_buf(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    fn describe(&self, path: &Path, datetime: &str) -> String {
        format!(
            "{} {} '{}'",
            self.program,
            Self::args(datetime).join(" "),
            path.display()
        )
    }
}
