//! Username validation
//!
//! Letters, digits, underscore, dot and hyphen; 3 to 32 characters.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 32;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("invalid username regex"));

/// Validated username
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Create a username from form input. Surrounding whitespace is trimmed.
    ///
    /// # Example
    /// ```
    /// use worklog_server::models::Username;
    ///
    /// assert!(Username::new("ada.lovelace").is_ok());
    /// assert!(Username::new("ab").is_err());         // too short
    /// assert!(Username::new("ada lovelace").is_err()); // space
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "username" });
        }

        let len = s.chars().count();
        if len < MIN_USERNAME_LEN {
            return Err(ValidationError::TooShort {
                field: "username",
                min: MIN_USERNAME_LEN,
            });
        }
        if len > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_USERNAME_LEN,
            });
        }

        if !USERNAME_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "username",
                reason: "may only contain letters, digits, '_', '.' and '-'",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
