//! Free-text content validation for entries and summaries

use super::ValidationError;

/// Maximum length for a daily entry
const MAX_ENTRY_LEN: usize = 10_000;

/// Maximum length for a weekly summary
const MAX_SUMMARY_LEN: usize = 20_000;

fn validated(s: &str, field: &'static str, max: usize) -> Result<String, ValidationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if s.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(s.to_owned())
}

/// Validated daily entry text (plaintext, before encryption)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryText(String);

impl EntryText {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validated(s, "entry", MAX_ENTRY_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated weekly summary text (plaintext, before encryption)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryText(String);

impl SummaryText {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validated(s, "summary", MAX_SUMMARY_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_is_trimmed() {
        let entry = EntryText::new("  fixed the build \n").unwrap();
        assert_eq!(entry.as_str(), "fixed the build");
    }

    #[test]
    fn blank_entry_rejected() {
        let err = EntryText::new(" \n\t ").unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "entry" });
    }

    #[test]
    fn entry_length_counts_chars_not_bytes() {
        // 10_000 multi-byte chars is still within the limit
        assert!(EntryText::new(&"é".repeat(10_000)).is_ok());
        assert!(EntryText::new(&"a".repeat(10_001)).is_err());
    }

    #[test]
    fn summary_has_larger_limit() {
        assert!(SummaryText::new(&"a".repeat(15_000)).is_ok());
        let err = SummaryText::new(&"a".repeat(20_001)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 20_000, .. }));
    }
}
