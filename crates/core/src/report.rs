use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total_files: usize,
    pub excluded: usize,
    pub skipped_unsupported: usize,
    pub recognized: usize,
    pub unrecognized: usize,
    pub metadata_written: usize,
    pub metadata_failed: usize,
    pub converted: usize,
    pub mtime_updated: usize,
    pub invalid_datetime: usize,
    pub moved: usize,
    pub move_failed: usize,
    pub already_in_place: usize,
    pub pattern_hits: BTreeMap<String, usize>,
}

impl RunStats {
    pub fn record_hit(&mut self, pattern_name: &str) {
        *self
            .pattern_hits
            .entry(pattern_name.to_string())
            .or_default() += 1;
    }
}

/// Plain-text list of files whose names carried no recognizable date,
/// one path per line.
#[derive(Debug, Clone)]
pub struct UnrecognizedLog {
    path: PathBuf,
}

impl UnrecognizedLog {
    /// Creates the parent directory and, with `clear`, truncates an existing list.
    pub fn open(path: impl Into<PathBuf>, clear: bool) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("could not create directory for unrecognized list: {}", parent.display())
            })?;
        }

        let mut options = OpenOptions::new();
        options.create(true);
        if clear {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }
        options
            .open(&path)
            .with_context(|| format!("could not open unrecognized list: {}", path.display()))?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, file: &Path) -> io::Result<()> {
        let mut out = OpenOptions::new().append(true).create(true).open(&self.path)?;
        writeln!(out, "{}", file.display())
    }
}
