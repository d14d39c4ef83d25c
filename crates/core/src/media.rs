use std::path::Path;

const PHOTO_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "heic", "heif", "tif", "tiff", "webp", "bmp", "gif",
];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "avi", "wmv", "flv", "webm", "3gp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    pub fn from_path(path: &Path) -> Option<MediaKind> {
        let ext = path.extension()?.to_str()?;
        if PHOTO_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(ext)) {
            Some(MediaKind::Photo)
        } else if VIDEO_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(ext)) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

pub fn is_png(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}
