//! Password strength policy for new accounts

use super::ValidationError;

const MIN_PASSWORD_LEN: usize = 8;
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// A password that satisfies the signup strength policy.
///
/// Only used when creating accounts; login accepts whatever was typed.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(String);

impl NewPassword {
    /// # Rules
    /// - At least 8 characters
    /// - At least one uppercase letter, one lowercase letter and one digit
    /// - At least one of `!@#$%^&*(),.?":{}|<>`
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let strong = s.chars().count() >= MIN_PASSWORD_LEN
            && s.chars().any(|c| c.is_ascii_uppercase())
            && s.chars().any(|c| c.is_ascii_lowercase())
            && s.chars().any(|c| c.is_ascii_digit())
            && s.chars().any(|c| SPECIAL_CHARS.contains(c));

        if !strong {
            return Err(ValidationError::WeakPassword);
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NewPassword(***)")
    }
}
