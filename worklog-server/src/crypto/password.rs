//! Password hashing (bcrypt on the blocking pool)

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub async fn hash_password(password: &str) -> Result<String, PasswordError> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await??;
    Ok(hash)
}

/// Check `password` against a stored hash.
///
/// A malformed stored hash is logged and treated as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let result = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await?;

    match result {
        Ok(matches) => Ok(matches),
        Err(err) => {
            tracing::warn!(error = %err, "stored password hash is malformed");
            Ok(false)
        }
    }
}
