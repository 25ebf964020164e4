use crate::errors::{AppError, Result};
use url::Url;

/// Checks the URL typed into the download form.
pub struct InputValidator {
    strict: bool,
}

impl InputValidator {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Trims the raw input. Returns `None` when nothing is left.
    pub fn normalize_url(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// In strict mode the URL must be an absolute http(s) URL with a host.
    /// Lenient mode accepts anything non-empty and leaves judgement to the server.
    pub fn validate_url(&self, url: &str) -> Result<()> {
        if !self.strict {
            return Ok(());
        }

        let parsed_url = Url::parse(url)
            .map_err(|e| AppError::Validation(format!("Invalid URL: {}", e)))?;

        if !matches!(parsed_url.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "Invalid URL: unsupported scheme {}",
                parsed_url.scheme()
            )));
        }

        if parsed_url.host_str().map_or(true, str::is_empty) {
            return Err(AppError::Validation("Invalid URL: URL must have a host".to_string()));
        }

        Ok(())
    }
}
