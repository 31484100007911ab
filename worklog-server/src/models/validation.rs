//! Validation error types

use std::fmt;

/// Validation error for form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field is shorter than allowed
    TooShort { field: &'static str, min: usize },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Password fails the strength policy
    WeakPassword,

    /// Date range ends before it starts
    InvertedRange { start: &'static str, end: &'static str },

    /// Value lies outside what can be represented
    OutOfRange { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooShort { field, min } => {
                write!(f, "{} must be at least {} characters", field, min)
            }
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::WeakPassword => f.write_str(
                "Password must be at least 8 characters long and include an uppercase letter, \
                 lowercase letter, number, and special character.",
            ),
            Self::InvertedRange { start, end } => {
                write!(f, "{} must not be before {}", end, start)
            }
            Self::OutOfRange { field } => write!(f, "{} is out of range", field),
        }
    }
}

impl std::error::Error for ValidationError {}
