//! Sign-up credential policy.

use keepsake_core::config::AuthConfig;
use keepsake_core::error::AppError;

/// Normalizes emails and enforces the password length policy.
#[derive(Debug, Clone)]
pub struct CredentialValidator {
    min_length: usize,
}

impl CredentialValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Trim and lower-case an email, rejecting obviously malformed ones.
    pub fn normalize_email(&self, email: &str) -> Result<String, AppError> {
        let email = email.trim().to_lowercase();
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty()
                    && domain
                        .split_once('.')
                        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
            });
        if !valid {
            return Err(AppError::validation(format!("Invalid email address: {email}")));
        }
        Ok(email)
    }

    /// Check a new password against the policy.
    pub fn validate_password(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password should be at least {} characters.",
                self.min_length
            )));
        }
        Ok(())
    }
}
