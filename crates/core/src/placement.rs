use crate::extractor::DateCandidate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoveError {
    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),
    #[error("file has no name: {0}")]
    NoFileName(PathBuf),
    #[error("could not create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not move {from} -> {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// `<root>/<year>/<month>`, or `<root>/<month>` when the root itself is
/// already the year folder.
pub fn destination_dir(root: &Path, date: &DateCandidate) -> PathBuf {
    let year = date.year_dir();
    let root_is_year = root
        .file_name()
        .map(|name| name.to_string_lossy() == year.as_str())
        .unwrap_or(false);

    if root_is_year {
        root.join(date.month_dir())
    } else {
        root.join(year).join(date.month_dir())
    }
}

/// False when the file already sits in a `<year>/<month>` folder.
pub fn should_move_file(path: &Path, year: &str, month: &str) -> bool {
    let mut parents = path
        .parent()
        .into_iter()
        .flat_map(|parent| parent.components().rev())
        .map(|component| component.as_os_str().to_string_lossy().into_owned());

    let current_month = parents.next();
    let current_year = parents.next();
    !(current_year.as_deref() == Some(year) && current_month.as_deref() == Some(month))
}

/// Moves `path` into `dest_dir`, creating it as needed. Never overwrites.
pub fn move_file(path: &Path, dest_dir: &Path) -> Result<PathBuf, MoveError> {
    let name = path
        .file_name()
        .ok_or_else(|| MoveError::NoFileName(path.to_path_buf()))?;
    fs::create_dir_all(dest_dir).map_err(|source| MoveError::CreateDir {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    let target = dest_dir.join(name);
    if target.exists() {
        return Err(MoveError::DestinationExists(target));
    }

    fs::rename(path, &target).map_err(|source| MoveError::Rename {
        from: path.to_path_buf(),
        to: target.clone(),
        source,
    })?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::{destination_dir, move_file, should_move_file, MoveError};
    use crate::extractor::FilenameDateExtractor;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn destination_nests_year_and_month() {
        let date = FilenameDateExtractor::default()
            .extract("IMG_20230815_143000")
            .expect("date");
        assert_eq!(
            destination_dir(Path::new("/media/photos"), &date),
            Path::new("/media/photos/2023/08")
        );
        assert_eq!(
            destination_dir(Path::new("/media/2023"), &date),
            Path::new("/media/2023/08")
        );
        assert_eq!(
            destination_dir(Path::new("/media/2022"), &date),
            Path::new("/media/2022/2023/08")
        );
    }

    #[test]
    fn already_organized_files_stay() {
        assert!(!should_move_file(
            Path::new("/root/2023/08/IMG_20230815.jpg"),
            "2023",
            "08"
        ));
        assert!(should_move_file(
            Path::new("/root/2023/09/IMG_20230815.jpg"),
            "2023",
            "08"
        ));
        assert!(should_move_file(
            Path::new("/root/IMG_20230815.jpg"),
            "2023",
            "08"
        ));
        assert!(should_move_file(Path::new("IMG_20230815.jpg"), "2023", "08"));
        assert!(should_move_file(Path::new("08/IMG_20230815.jpg"), "2023", "08"));
    }

    #[test]
    fn move_creates_directories() {
        let temp = tempdir().expect("tempdir");
        let src = temp.path().join("IMG_20230815.jpg");
        fs::write(&src, b"x").expect("fixture");

        let dest = temp.path().join("2023/08");
        let moved = move_file(&src, &dest).expect("move");
        assert_eq!(moved, dest.join("IMG_20230815.jpg"));
        assert!(moved.exists());
        assert!(!src.exists());
    }

    #[test]
    fn move_refuses_to_overwrite() {
        let temp = tempdir().expect("tempdir");
        let src = temp.path().join("IMG_20230815.jpg");
        let dest = temp.path().join("2023/08");
        fs::create_dir_all(&dest).expect("dest");
        fs::write(&src, b"new").expect("src");
        fs::write(dest.join("IMG_20230815.jpg"), b"old").expect("existing");

        let err = move_file(&src, &dest).expect_err("collision");
        assert!(matches!(err, MoveError::DestinationExists(_)));
        assert!(src.exists());
        assert_eq!(
            fs::read(dest.join("IMG_20230815.jpg")).expect("read"),
            b"old"
        );
    }
}
