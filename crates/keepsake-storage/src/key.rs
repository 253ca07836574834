//! Storage key validation and URL joining.

use keepsake_core::error::AppError;
use keepsake_core::result::AppResult;

/// Reject keys that are empty, absolute, or escape the store root.
pub fn validate_key(key: &str) -> AppResult<&str> {
    let trimmed = key.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(AppError::validation("Storage key is empty"));
    }
    if trimmed.split('/').any(|segment| segment == ".." || segment.is_empty()) {
        return Err(AppError::validation(format!("Invalid storage key: {key}")));
    }
    Ok(trimmed)
}

/// Join a base URL and a key with exactly one slash.
pub fn join_url(base: &str, key: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert_eq!(validate_key("/album/1.jpg").unwrap(), "album/1.jpg");
        assert!(validate_key("").is_err());
        assert!(validate_key("album/../etc/passwd").is_err());
        assert!(validate_key("album//1.jpg").is_err());
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://cdn.example.com/photos/", "/a/1.jpg"),
            "https://cdn.example.com/photos/a/1.jpg"
        );
    }
}
