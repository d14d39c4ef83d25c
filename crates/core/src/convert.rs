use image::ImageFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("JPEG copy already exists: {0}")]
    TargetExists(PathBuf),
    #[error("image conversion failed for {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub fn jpeg_copy_path(path: &Path) -> PathBuf {
    path.with_extension("jpg")
}

/// Decodes `path`, drops any alpha channel and writes a JPEG beside it.
/// The source file is left untouched.
pub fn convert_to_jpeg(path: &Path) -> Result<PathBuf, ConvertError> {
    let target = jpeg_copy_path(path);
    if target.exists() {
        return Err(ConvertError::TargetExists(target));
    }

    let image = image::open(path).map_err(|source| ConvertError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    image
        .to_rgb8()
        .save_with_format(&target, ImageFormat::Jpeg)
        .map_err(|source| ConvertError::Image {
            path: target.clone(),
            source,
        })?;

    Ok(target)
}
