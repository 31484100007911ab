//! Field-level encryption for stored free text
//!
//! Each value is sealed with XChaCha20-Poly1305 under the process-wide key.
//! Stored form: URL-safe base64 of `nonce (24) || ciphertext || tag (16)`.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;

const KEY_SIZE: usize = 32;
const NONCE_SIZE: usize = 24;
const TAG_SIZE: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("encryption key must be base64 encoding of {KEY_SIZE} bytes")]
    InvalidKey,

    #[error("ciphertext is not valid base64")]
    Encoding,

    #[error("ciphertext is truncated")]
    Truncated,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decrypted text is not valid UTF-8")]
    NotUtf8,
}

/// Symmetric cipher for ciphertext columns.
#[derive(Clone)]
pub struct FieldCipher {
    key: [u8; KEY_SIZE],
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

/// Generate a new random key, base64 encoded for `ENCRYPTION_KEY`.
pub fn generate_key() -> String {
    let mut key = [0u8; KEY_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut key);
    URL_SAFE.encode(key)
}

fn decode_any(input: &str) -> Option<Vec<u8>> {
    [&URL_SAFE, &URL_SAFE_NO_PAD, &STANDARD, &STANDARD_NO_PAD]
        .into_iter()
        .find_map(|engine| engine.decode(input).ok())
}

impl FieldCipher {
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Build from a base64 key in either the URL-safe or standard alphabet.
    pub fn from_base64_key(encoded: &str) -> Result<Self, CipherError> {
        let bytes = decode_any(encoded.trim()).ok_or(CipherError::InvalidKey)?;
        let key: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| CipherError::InvalidKey)?;
        Ok(Self::new(key))
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let cipher = XChaCha20Poly1305::new((&self.key).into());
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = XNonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::EncryptionFailed)?;

        let mut output = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        output.extend_from_slice(&nonce_bytes);
        output.extend_from_slice(&ciphertext);
        Ok(URL_SAFE.encode(output))
    }

    pub fn decrypt(&self, stored: &str) -> Result<String, CipherError> {
        let data = URL_SAFE
            .decode(stored.trim())
            .map_err(|_| CipherError::Encoding)?;
        if data.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CipherError::Truncated);
        }

        let (nonce_bytes, ciphertext) = data.split_at(NONCE_SIZE);
        let cipher = XChaCha20Poly1305::new((&self.key).into());
        let plaintext = cipher
            .decrypt(XNonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CipherError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::NotUtf8)
    }

    /// Decrypt for display. Failures are logged and replaced by `placeholder`.
    pub fn decrypt_or_placeholder(&self, stored: &str, placeholder: &str) -> String {
        match self.decrypt(stored) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "failed to decrypt stored field");
                placeholder.to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> FieldCipher {
        FieldCipher::from_base64_key(&generate_key()).unwrap()
    }

    #[test]
    fn entry_survives_round_trip() {
        let cipher = cipher();
        let stored = cipher.encrypt("Reviewed PR #42, paired on the importer").unwrap();
        assert_ne!(stored, "Reviewed PR #42, paired on the importer");
        assert_eq!(
            cipher.decrypt(&stored).unwrap(),
            "Reviewed PR #42, paired on the importer"
        );
    }

    #[test]
    fn same_plaintext_encrypts_differently() {
        let cipher = cipher();
        assert_ne!(cipher.encrypt("same").unwrap(), cipher.encrypt("same").unwrap());
    }

    #[test]
    fn wrong_key_fails() {
        let stored = cipher().encrypt("Secret entry").unwrap();
        assert!(matches!(
            cipher().decrypt(&stored),
            Err(CipherError::DecryptionFailed)
        ));
    }

    #[test]
    fn tampered_ciphertext_yields_placeholder() {
        let cipher = cipher();
        let stored = cipher.encrypt("Important data").unwrap();
        let mut raw = URL_SAFE.decode(&stored).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        let tampered = URL_SAFE.encode(raw);

        assert_eq!(
            cipher.decrypt_or_placeholder(&tampered, "[Error decrypting entry]"),
            "[Error decrypting entry]"
        );
    }

    #[test]
    fn legacy_plaintext_is_rejected() {
        let cipher = cipher();
        assert!(cipher.decrypt("just some text").is_err());
        assert!(matches!(cipher.decrypt(""), Err(CipherError::Truncated)));
    }

    #[test]
    fn key_accepts_both_alphabets() {
        let key = [0xFBu8; 32];
        assert!(FieldCipher::from_base64_key(&URL_SAFE.encode(key)).is_ok());
        assert!(FieldCipher::from_base64_key(&STANDARD.encode(key)).is_ok());
        assert!(FieldCipher::from_base64_key(&STANDARD_NO_PAD.encode(key)).is_ok());
    }

    #[test]
    fn key_must_be_32_bytes() {
        let short = URL_SAFE.encode([1u8; 16]);
        assert!(matches!(
            FieldCipher::from_base64_key(&short),
            Err(CipherError::InvalidKey)
        ));
        assert!(FieldCipher::from_base64_key("not base64 at all!").is_err());
    }

    #[test]
    fn debug_does_not_leak_key() {
        let cipher = FieldCipher::new([7u8; 32]);
        assert_eq!(format!("{:?}", cipher), "FieldCipher { .. }");
    }
}
