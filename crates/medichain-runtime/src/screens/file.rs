//! Files picked by the user for upload.

use super::state::ScreenError;
use std::fs;
use std::path::Path;

/// Largest record accepted for upload (10 MiB).
pub const MAX_RECORD_SIZE: usize = 10 * 1024 * 1024;

/// MIME types accepted for medical records.
pub const ALLOWED_RECORD_TYPES: [&str; 4] =
    ["application/pdf", "image/jpeg", "image/png", "image/jpg"];

/// A named blob with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl RecordFile {
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Read a file from disk, guessing its type from the extension.
    pub fn read(path: &Path) -> Result<Self, ScreenError> {
        let data = fs::read(path)
            .map_err(|e| ScreenError::Validation(format!("Cannot read {}: {e}", path.display())))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "record".to_string());
        Ok(Self::new(name, content_type_for(path), data))
    }

    /// Size and type checks for medical records.
    pub fn validate_record(&self) -> Result<(), ScreenError> {
        if self.data.len() > MAX_RECORD_SIZE {
            return Err(ScreenError::Validation(
                "File size must be less than 10MB".into(),
            ));
        }
        if !ALLOWED_RECORD_TYPES.contains(&self.content_type.as_str()) {
            return Err(ScreenError::Validation(
                "Only PDF, JPG, and PNG files are allowed".into(),
            ));
        }
        Ok(())
    }
}

/// MIME type from a file extension; unknown extensions are opaque bytes.
#[must_use]
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "json" => "application/json",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_accepts_pdf_and_images() {
        for ty in ALLOWED_RECORD_TYPES {
            assert!(RecordFile::new("a", ty, vec![1]).validate_record().is_ok());
        }
    }

    #[test]
    fn test_rejects_other_types() {
        let err = RecordFile::new("a.txt", "text/plain", vec![1])
            .validate_record()
            .unwrap_err();
        assert_eq!(err.message(), "Only PDF, JPG, and PNG files are allowed");
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let at_limit = RecordFile::new("a.pdf", "application/pdf", vec![0; MAX_RECORD_SIZE]);
        assert!(at_limit.validate_record().is_ok());
        let over = RecordFile::new("a.pdf", "application/pdf", vec![0; MAX_RECORD_SIZE + 1]);
        assert_eq!(
            over.validate_record().unwrap_err().message(),
            "File size must be less than 10MB"
        );
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(content_type_for(&PathBuf::from("scan.PNG")), "image/png");
        assert_eq!(content_type_for(&PathBuf::from("x.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(&PathBuf::from("noext")), "application/octet-stream");
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        fs::write(&path, b"%PDF-1.4").unwrap();
        let file = RecordFile::read(&path).unwrap();
        assert_eq!(file.name, "report.pdf");
        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(file.data, b"%PDF-1.4");
        assert!(RecordFile::read(&dir.path().join("missing.pdf")).is_err());
    }
}
