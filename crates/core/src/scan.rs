use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// A directory whose contents are skipped during a run.
#[derive(Debug, Clone)]
pub struct Exclusion {
    raw: PathBuf,
    resolved: Option<PathBuf>,
}

impl Exclusion {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let raw = path.into();
        let resolved = fs::canonicalize(&raw).ok();
        Self { raw, resolved }
    }

    pub fn path(&self) -> &Path {
        &self.raw
    }

    /// Resolved-path prefix match on the file's directory; falls back to a
    /// substring match on the raw paths when either side cannot be resolved.
    /// The file itself is not resolved, so a symlink is judged by where it
    /// sits rather than where it points.
    pub fn matches(&self, path: &Path) -> bool {
        if let Some(resolved) = &self.resolved {
            let parent = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            if let Ok(dir) = fs::canonicalize(parent) {
                return dir.starts_with(resolved);
            }
        }

        let needle = self.raw.to_string_lossy();
        !needle.is_empty() && path.to_string_lossy().contains(needle.as_ref())
    }
}

/// Every regular file below `root`, sorted by name within each directory.
/// The list is built up front so files moved during a run are not revisited.
pub fn collect_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("   Could not read entry under {}: {err}", root.display());
                continue;
            }
        };
        if entry.file_type().is_file() {
            out.push(entry.into_path());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{collect_files, Exclusion};
    use std::fs::{self, File};
    use std::path::Path;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dirs must be creatable");
        }
        File::create(path).expect("file must be creatable");
    }

    #[test]
    fn collects_recursively_in_name_order() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        touch(&root.join("b.jpg"));
        touch(&root.join("a.jpg"));
        touch(&root.join("sub/c.mp4"));
        fs::create_dir_all(root.join("empty")).expect("empty dir");

        let files = collect_files(root);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).expect("under root").to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                Path::new("a.jpg").to_path_buf(),
                Path::new("b.jpg").to_path_buf(),
                Path::new("sub/c.mp4").to_path_buf(),
            ]
        );
    }

    #[test]
    fn exclusion_matches_nested_files_by_resolved_prefix() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        let skipped = root.join("skip/deep/IMG_20230101.jpg");
        let kept = root.join("keep/IMG_20230101.jpg");
        let sibling = root.join("skipper/IMG_20230101.jpg");
        touch(&skipped);
        touch(&kept);
        touch(&sibling);

        let exclusion = Exclusion::new(root.join("skip"));
        assert!(exclusion.matches(&skipped));
        assert!(!exclusion.matches(&kept));
        assert!(!exclusion.matches(&sibling));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_is_judged_by_its_own_folder() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        let target = root.join("skip/IMG_20230101.jpg");
        touch(&target);
        let real = root.join("keep/IMG_20230202.jpg");
        touch(&real);
        let outside = root.join("keep/link.jpg");
        std::os::unix::fs::symlink(&target, &outside).expect("symlink");
        let inside = root.join("skip/link.jpg");
        std::os::unix::fs::symlink(&real, &inside).expect("symlink");

        let exclusion = Exclusion::new(root.join("skip"));
        assert!(!exclusion.matches(&outside));
        assert!(exclusion.matches(&inside));
    }

    #[test]
    fn exclusion_falls_back_to_substring_when_unresolvable() {
        let exclusion = Exclusion::new("does-not-exist/trash");
        assert!(exclusion.matches(Path::new("/x/does-not-exist/trash/a.jpg")));
        assert!(!exclusion.matches(Path::new("/x/other/a.jpg")));
    }
}
