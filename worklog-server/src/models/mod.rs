//! Domain models with validation at construction
//!
//! All form input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod contact;
pub mod entry;
pub mod password;
pub mod username;
pub mod validation;
pub mod week;

pub use contact::ContactDetails;
pub use entry::{EntryText, SummaryText};
pub use password::NewPassword;
pub use username::Username;
pub use validation::ValidationError;
pub use week::Week;
