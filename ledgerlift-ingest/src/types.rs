use std::path::{Path, PathBuf};

use crate::error::ExtractionError;

/// Document types the extraction service accepts inline.
pub const ACCEPTED_MIME_TYPES: [&str; 4] =
    ["application/pdf", "image/jpeg", "image/png", "image/webp"];

const FALLBACK_MIME: &str = "application/octet-stream";

/// Exact match against the allow-list.
pub fn is_accepted_mime(mime_type: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&mime_type)
}

/// Guess a MIME type from a file extension (case-insensitive).
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => FALLBACK_MIME,
    }
}

/// Where a document's bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum FileContent {
    Bytes(Vec<u8>),
    /// Read lazily, when the batch reaches this file
    Path(PathBuf),
}

/// One user-selected document
#[derive(Debug, Clone, PartialEq)]
pub struct FileInput {
    pub name: String,
    pub mime_type: String,
    pub content: FileContent,
}

impl FileInput {
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: FileContent::Bytes(bytes),
        }
    }

    /// Name and MIME type come from the path; bytes are not read yet.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            mime_type: mime_for_path(&path).to_string(),
            content: FileContent::Path(path),
        }
    }

    pub fn is_accepted(&self) -> bool {
        is_accepted_mime(&self.mime_type)
    }

    pub async fn load(&self) -> Result<Vec<u8>, ExtractionError> {
        match &self.content {
            FileContent::Bytes(b) => Ok(b.clone()),
            FileContent::Path(p) => {
                tokio::fs::read(p)
                    .await
                    .map_err(|source| ExtractionError::Read {
                        path: p.display().to_string(),
                        source,
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("march.PDF")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("scan.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("page.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("page.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("notes.txt")), FALLBACK_MIME);
        assert_eq!(mime_for_path(Path::new("README")), FALLBACK_MIME);
    }

    #[test]
    fn test_allow_list_is_exact() {
        assert!(is_accepted_mime("application/pdf"));
        assert!(!is_accepted_mime("image/gif"));
        assert!(!is_accepted_mime("Application/PDF"));
    }

    #[test]
    fn test_from_path_keeps_base_name() {
        let f = FileInput::from_path("/tmp/statements/feb.pdf");
        assert_eq!(f.name, "feb.pdf");
        assert_eq!(f.mime_type, "application/pdf");
        assert!(f.is_accepted());
    }

    #[tokio::test]
    async fn test_load_missing_path_is_read_error() {
        let f = FileInput::from_path("/definitely/not/here.pdf");
        let err = f.load().await.unwrap_err();
        assert!(matches!(err, ExtractionError::Read { .. }));
        assert!(err.is_local());
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("a.png");
        std::fs::write(&p, b"\x89PNG").unwrap();
        let f = FileInput::from_path(&p);
        assert_eq!(f.load().await.unwrap(), b"\x89PNG".to_vec());
    }
}
