//! Password hashing built around Argon2id.
//!
//! The configuration is centralized so every password uses the same memory,
//! iteration, and parallelism parameters. Hashes are stored as PHC strings
//! (`$argon2id$v=19$m=…`), which embed the algorithm, parameters, and salt —
//! verification needs nothing but the stored string.

use argon2::password_hash::SaltString;
use argon2::{
    password_hash, Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier,
    Version,
};
use rand::rngs::OsRng;
use thiserror::Error;

/// Tuned Argon2id parameters for an interactive login flow.
/// - memory_cost: 19 MiB keeps GPU cracking expensive while remaining server friendly
/// - time_cost: 2 iterations for interactive latency without sacrificing safety
/// - parallelism: 1 thread to keep resource usage predictable on shared hosts
const MEMORY_COST_KIB: u32 = 19 * 1024;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hashing(#[source] password_hash::Error),
    /// Covers every verification failure — a wrong password, a stored hash
    /// that does not parse, bad parameters. Callers must not be able to tell
    /// these apart, and neither should their callers' HTTP clients.
    #[error("incorrect password")]
    IncorrectPassword,
}

fn argon2_config() -> Result<Argon2<'static>, password_hash::Error> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with Argon2id and returns the PHC string.
pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = argon2_config().map_err(AuthError::Hashing)?;
    let password_hash = argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(AuthError::Hashing)?
        .to_string();
    Ok(password_hash)
}

/// Verifies a plaintext password against a previously stored PHC string.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed_hash =
        PasswordHash::new(stored_hash).map_err(|_| AuthError::IncorrectPassword)?;
    let argon2 = argon2_config().map_err(|_| AuthError::IncorrectPassword)?;
    argon2
        .verify_password(plaintext.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::IncorrectPassword)
}
