//! Path utilities for mapping file extensions to mime types.
//!
//! Used at ingestion when the uploader does not supply a content type.

use std::path::Path;

/// Known extensions and their mime types.
const MIME_TABLE: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("mp3", "audio/mpeg"),
    ("ogg", "audio/ogg"),
    ("wav", "audio/wav"),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("html", "text/html"),
    ("json", "application/json"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
];

/// Fallback for unknown extensions.
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Look up the mime type for an extension (without the leading dot).
///
/// # Examples
///
/// ```
/// use mediavault_common::paths::mime_for_extension;
///
/// assert_eq!(mime_for_extension("PNG"), "image/png");
/// assert_eq!(mime_for_extension("xyz"), "application/octet-stream");
/// ```
pub fn mime_for_extension(ext: &str) -> &'static str {
    let ext = ext.trim_start_matches('.').to_lowercase();
    MIME_TABLE
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME)
}

/// Look up the mime type for a file path by its extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use mediavault_common::paths::mime_for_path;
///
/// assert_eq!(mime_for_path(Path::new("/tmp/clip.webm")), "video/webm");
/// assert_eq!(mime_for_path(Path::new("README")), "application/octet-stream");
/// ```
pub fn mime_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(mime_for_extension)
        .unwrap_or(DEFAULT_MIME)
}

/// The extension of a file name including the leading dot, or an empty string.
///
/// # Examples
///
/// ```
/// use mediavault_common::paths::dotted_extension;
///
/// assert_eq!(dotted_extension("holiday.JPG"), ".JPG");
/// assert_eq!(dotted_extension("archive.tar.gz"), ".gz");
/// assert_eq!(dotted_extension("Makefile"), "");
/// assert_eq!(dotted_extension(".bashrc"), "");
/// ```
pub fn dotted_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}
