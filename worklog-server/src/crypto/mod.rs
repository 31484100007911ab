//! Secrets at rest: field encryption for journal text, hashing for passwords

pub mod cipher;
pub mod password;

pub use cipher::{generate_key, CipherError, FieldCipher};
pub use password::{hash_password, verify_password, PasswordError};
