//! Files handed to the upload pipeline.

use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::fs;

use keepsake_core::error::{AppError, ErrorKind};
use keepsake_core::result::AppResult;

/// An image file waiting to be uploaded.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original file name, used for the extension.
    pub name: String,
    pub data: Bytes,
    /// Last-modified time, the capture-date fallback.
    pub modified: Option<DateTime<Utc>>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            modified: None,
        }
    }

    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Read a file from disk along with its modification time.
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let data = fs::read(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read {}", path.display()),
                e,
            )
        })?;
        let modified = fs::metadata(path)
            .await
            .ok()
            .and_then(|meta| meta.modified().ok())
            .map(DateTime::<Utc>::from);
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            data: Bytes::from(data),
            modified,
        })
    }

    /// Lower-cased extension, `"bin"` when the name has none.
    pub fn extension(&self) -> String {
        match self.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_lowercase(),
            _ => "bin".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(UploadFile::new("IMG_001.JPG", Bytes::new()).extension(), "jpg");
        assert_eq!(UploadFile::new("archive.tar.gz", Bytes::new()).extension(), "gz");
        assert_eq!(UploadFile::new("README", Bytes::new()).extension(), "bin");
        assert_eq!(UploadFile::new(".hidden", Bytes::new()).extension(), "bin");
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beach.png");
        tokio::fs::write(&path, b"png").await.unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "beach.png");
        assert_eq!(file.data, Bytes::from_static(b"png"));
        assert!(file.modified.is_some());
    }
}
