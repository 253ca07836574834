//! Capture-date extraction.

use std::io::Cursor;

use chrono::{DateTime, NaiveDateTime, Utc};
use exif::{In, Reader, Tag};
use tracing::debug;

use keepsake_core::error::AppError;
use keepsake_core::result::AppResult;

use crate::upload::UploadFile;

/// EXIF date tags in order of preference.
const DATE_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Determines when a photo was taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Capture date of an upload: the first EXIF date tag present, else
    /// the file's modification time, else `now`.
    pub fn captured_at(&self, file: &UploadFile, now: DateTime<Utc>) -> DateTime<Utc> {
        match Self::exif_date(&file.data) {
            Ok(Some(date)) => return date,
            Ok(None) => debug!(file = %file.name, "No EXIF date"),
            Err(e) => debug!(file = %file.name, error = %e, "Failed to read EXIF"),
        }
        file.modified.unwrap_or(now)
    }

    /// Read the preferred EXIF date from an image container.
    pub fn exif_date(data: &[u8]) -> AppResult<Option<DateTime<Utc>>> {
        let exif = Reader::new()
            .read_from_container(&mut Cursor::new(data))
            .map_err(|e| AppError::metadata(format!("Unreadable EXIF: {e}")))?;

        Ok(DATE_TAGS
            .iter()
            .filter_map(|tag| exif.get_field(*tag, In::PRIMARY))
            .find_map(|field| parse_exif_datetime(&field.display_value().to_string())))
    }
}

/// Parse `"2023:01:15 10:30:00"` or `"2023-01-15 10:30:00"` as UTC.
pub fn parse_exif_datetime(value: &str) -> Option<DateTime<Utc>> {
    let cleaned = value.replace(['"', '\0'], "");
    let cleaned = cleaned.trim();
    ["%Y:%m:%d %H:%M:%S", "%F %T"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(cleaned, format).ok())
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::TimeZone;

    /// A minimal JPEG whose only EXIF field is `DateTimeOriginal`.
    fn jpeg_with_date(date: &str) -> Vec<u8> {
        assert_eq!(date.len(), 19);
        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"MM\0\x2a\0\0\0\x08");
        // IFD0: one entry, the Exif IFD pointer.
        tiff.extend_from_slice(&[0, 1, 0x87, 0x69, 0, 4, 0, 0, 0, 1, 0, 0, 0, 26]);
        tiff.extend_from_slice(&[0, 0, 0, 0]);
        // Exif IFD: DateTimeOriginal, ASCII, 20 bytes at offset 44.
        tiff.extend_from_slice(&[0, 1, 0x90, 0x03, 0, 2, 0, 0, 0, 20, 0, 0, 0, 44]);
        tiff.extend_from_slice(&[0, 0, 0, 0]);
        tiff.extend_from_slice(date.as_bytes());
        tiff.push(0);

        let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe1];
        let len = (tiff.len() + 6 + 2) as u16;
        jpeg.extend_from_slice(&len.to_be_bytes());
        jpeg.extend_from_slice(b"Exif\0\0");
        jpeg.extend_from_slice(&tiff);
        jpeg.extend_from_slice(&[0xff, 0xd9]);
        jpeg
    }

    #[test]
    fn test_parse_exif_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2023, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(parse_exif_datetime("2023:01:15 10:30:00"), Some(expected));
        assert_eq!(parse_exif_datetime("\"2023-01-15 10:30:00\""), Some(expected));
        assert_eq!(parse_exif_datetime("yesterday"), None);
    }

    #[test]
    fn test_exif_date_from_jpeg() {
        let data = jpeg_with_date("2024:07:04 18:00:00");
        let date = MetadataExtractor::exif_date(&data).unwrap();
        assert_eq!(date, Some(Utc.with_ymd_and_hms(2024, 7, 4, 18, 0, 0).unwrap()));
    }

    #[test]
    fn test_fallbacks() {
        let extractor = MetadataExtractor::new();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let modified = Utc.with_ymd_and_hms(2025, 5, 5, 5, 5, 5).unwrap();

        let plain = UploadFile::new("a.jpg", Bytes::from_static(b"not an image"));
        assert_eq!(extractor.captured_at(&plain, now), now);
        assert_eq!(extractor.captured_at(&plain.with_modified(modified), now), modified);
    }
}
