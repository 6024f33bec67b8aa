//! Files chosen for upload, and the markdown emitted once they land.

use bytes::Bytes;
use mime_sniffer::MimeTypeSniffer;
use smol_str::SmolStr;

/// Fallback when the content doesn't match any known signature.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A file picked or dropped by the user.
#[derive(Clone, Debug)]
pub struct UploadFile {
    /// The filename, used as the link text
    pub name: SmolStr,
    /// Size in bytes
    pub size: u64,
    /// MIME type (sniffed from bytes unless overridden)
    pub mime_type: SmolStr,
    /// Raw file bytes
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<SmolStr>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let mime_type = data.sniff_mime_type().unwrap_or(DEFAULT_MIME_TYPE);
        Self {
            name: name.into(),
            size: data.len() as u64,
            mime_type: SmolStr::new(mime_type),
            data,
        }
    }

    /// Use the type the browser reported instead of the sniffed one.
    pub fn with_mime_type(mut self, mime_type: impl Into<SmolStr>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn is_image(&self, extensions: &[SmolStr]) -> bool {
        is_image_file(&self.name, extensions)
    }
}

/// Whether `name` has one of `extensions`, compared ASCII case-insensitively.
///
/// Only the text after the last `.` counts, so `"mypng"` is not an image.
pub fn is_image_file<S: AsRef<str>>(name: &str, extensions: &[S]) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    extensions
        .iter()
        .any(|candidate| candidate.as_ref().eq_ignore_ascii_case(ext))
}

/// Markdown for an uploaded file, on its own line.
pub fn markdown_link(name: &str, url: &str, image: bool) -> String {
    let bang = if image { "!" } else { "" };
    format!("\n{bang}[{name}]({url})\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "svg"];

    #[test]
    fn test_image_detection_ignores_case() {
        assert!(is_image_file("photo.PNG", &EXTS));
        assert!(is_image_file("scan.Jpeg", &EXTS));
        assert!(!is_image_file("notes.pdf", &EXTS));
    }

    #[test]
    fn test_image_detection_needs_a_dot() {
        assert!(!is_image_file("mypng", &EXTS));
        assert!(!is_image_file("archive.png.zip", &EXTS));
        assert!(is_image_file(".png", &EXTS));
    }

    #[test]
    fn test_markdown_link() {
        assert_eq!(
            markdown_link("photo.PNG", "/f/1", true),
            "\n![photo.PNG](/f/1)\n"
        );
        assert_eq!(
            markdown_link("notes.pdf", "/f/2", false),
            "\n[notes.pdf](/f/2)\n"
        );
    }

    #[test]
    fn test_new_sniffs_and_sizes() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
        let file = UploadFile::new("a.png", png);
        assert_eq!(file.size, 16);
        assert_eq!(file.mime_type, "image/png");

        let text = UploadFile::new("notes.txt", "hello").with_mime_type("text/plain");
        assert_eq!(text.mime_type, "text/plain");
        assert_eq!(text.size, 5);
    }
}
