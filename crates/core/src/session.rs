use crate::timestamp::set_file_times;
use chrono::{NaiveDateTime, TimeDelta};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const BASE_DATETIME_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";
const TARGET_NAME_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0} is not a valid directory")]
    InvalidFolder(PathBuf),
    #[error("date must be formatted YYYY-MM-DD-hh-mm-ss, got {0:?}")]
    InvalidDateTime(String),
    #[error("could not list {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One planned rename: the n-th file by name gets `base + n` seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRename {
    pub from: PathBuf,
    pub to: PathBuf,
    pub datetime: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionResult {
    pub renamed: usize,
    pub simulated: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub fn parse_base_datetime(input: &str) -> Result<NaiveDateTime, SessionError> {
    NaiveDateTime::parse_from_str(input, BASE_DATETIME_FORMAT)
        .map_err(|_| SessionError::InvalidDateTime(input.to_string()))
}

/// Lists the regular files directly inside `folder`, sorted by name.
pub fn plan_session(folder: &Path, base: NaiveDateTime) -> Result<Vec<SessionRename>, SessionError> {
    if !folder.is_dir() {
        return Err(SessionError::InvalidFolder(folder.to_path_buf()));
    }

    let read_err = |source| SessionError::ReadDir {
        path: folder.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(folder).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files
        .into_iter()
        .enumerate()
        .map(|(index, from)| {
            let datetime = base + TimeDelta::seconds(index as i64);
            let extension = from
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
                .unwrap_or_default();
            let to = folder.join(format!("{}{}", datetime.format(TARGET_NAME_FORMAT), extension));
            SessionRename { from, to, datetime }
        })
        .collect())
}

/// Renames in order, skipping any target that already exists. With
/// `dry_run` nothing on disk changes.
pub fn apply_session(plan: &[SessionRename], dry_run: bool) -> SessionResult {
    let mut result = SessionResult::default();

    for step in plan {
        let from_name = file_name(&step.from);
        let to_name = file_name(&step.to);

        if step.to.exists() {
            result.skipped += 1;
            warn!("Skipped, already exists: {to_name}");
            continue;
        }

        if dry_run {
            result.simulated += 1;
            info!("[Dry-run] {from_name} -> {to_name} (mtime: {})", step.datetime);
            continue;
        }

        if let Err(err) = fs::rename(&step.from, &step.to) {
            result.failed += 1;
            warn!("Could not rename {from_name} -> {to_name}: {err}");
            continue;
        }
        result.renamed += 1;

        match set_file_times(&step.to, &step.datetime) {
            Ok(()) => info!("{from_name} -> {to_name} (mtime updated)"),
            Err(err) => warn!("{from_name} -> {to_name} (mtime not updated: {err})"),
        }
    }

    result
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{apply_session, parse_base_datetime, plan_session, SessionError};
    use crate::timestamp::local_timestamp;
    use filetime::FileTime;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn names(dir: &Path) -> Vec<String> {
        let mut out: Vec<String> = fs::read_dir(dir)
            .expect("read_dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        out.sort();
        out
    }

    fn mtime(path: &Path) -> i64 {
        let meta = fs::metadata(path).expect("metadata");
        FileTime::from_last_modification_time(&meta).unix_seconds()
    }

    #[test]
    fn renames_sequentially_one_second_apart() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        fs::write(dir.join("c.MP4"), b"c").expect("c");
        fs::write(dir.join("a.JPG"), b"a").expect("a");
        fs::write(dir.join("b.png"), b"b").expect("b");
        fs::create_dir(dir.join("nested")).expect("nested dir is ignored");

        let base = parse_base_datetime("2024-01-01-00-00-00").expect("base");
        let plan = plan_session(dir, base).expect("plan");
        let result = apply_session(&plan, false);

        assert_eq!(result.renamed, 3);
        assert_eq!(
            names(dir),
            vec![
                "20240101_000000.jpg",
                "20240101_000001.png",
                "20240101_000002.mp4",
                "nested",
            ]
        );
        assert_eq!(fs::read(dir.join("20240101_000000.jpg")).expect("read"), b"a");

        let first = mtime(&dir.join("20240101_000000.jpg"));
        assert_eq!(first, local_timestamp(&base));
        assert_eq!(mtime(&dir.join("20240101_000001.png")), first + 1);
        assert_eq!(mtime(&dir.join("20240101_000002.mp4")), first + 2);
    }

    #[test]
    fn existing_target_is_skipped_not_overwritten() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            fs::write(dir.join(name), name.as_bytes()).expect("fixture");
        }

        let base = parse_base_datetime("2024-01-01-00-00-00").expect("base");
        let plan = plan_session(dir, base).expect("plan");
        fs::write(dir.join("20240101_000001.jpg"), b"keep").expect("collision");

        let result = apply_session(&plan, false);

        assert_eq!(result.renamed, 2);
        assert_eq!(result.skipped, 1);
        assert!(dir.join("b.jpg").exists());
        assert_eq!(
            fs::read(dir.join("20240101_000001.jpg")).expect("read"),
            b"keep"
        );
        assert_eq!(
            fs::read(dir.join("20240101_000002.jpg")).expect("read"),
            b"c.jpg"
        );
    }

    #[test]
    fn dry_run_changes_nothing() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        fs::write(dir.join("a.jpg"), b"a").expect("a");
        fs::write(dir.join("b.jpg"), b"b").expect("b");
        let before_names = names(dir);
        let before_mtime = mtime(&dir.join("a.jpg"));

        let base = parse_base_datetime("2024-01-01-00-00-00").expect("base");
        let plan = plan_session(dir, base).expect("plan");
        let result = apply_session(&plan, true);

        assert_eq!(result.simulated, 2);
        assert_eq!(result.renamed, 0);
        assert_eq!(names(dir), before_names);
        assert_eq!(mtime(&dir.join("a.jpg")), before_mtime);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(matches!(
            parse_base_datetime("2024-01-01 00:00:00"),
            Err(SessionError::InvalidDateTime(_))
        ));

        let temp = tempdir().expect("tempdir");
        let base = parse_base_datetime("2024-01-01-00-00-00").expect("base");
        assert!(matches!(
            plan_session(&temp.path().join("missing"), base),
            Err(SessionError::InvalidFolder(_))
        ));
    }
}
