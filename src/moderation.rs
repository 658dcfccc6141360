//! Chirp body validation and profanity redaction.
//!
//! A chirp is at most [`MAX_CHIRP_LENGTH`] bytes. Denylisted words are
//! replaced with `****` — matching is case-insensitive but only on whole
//! words, so `kerfuffle!` sails through while `KeRfUfFlE` does not.

use std::collections::HashSet;
use std::sync::OnceLock;

use thiserror::Error;

/// Maximum chirp length, in bytes of UTF-8.
pub const MAX_CHIRP_LENGTH: usize = 140;

const REDACTED: &str = "****";

fn denylist() -> &'static HashSet<&'static str> {
    static DENYLIST: OnceLock<HashSet<&'static str>> = OnceLock::new();
    DENYLIST.get_or_init(|| HashSet::from(["kerfuffle", "sharbert", "fornax"]))
}

#[derive(Debug, Error, PartialEq)]
pub enum ModerationError {
    #[error("Chirp is too long")]
    TooLong,
}

/// Validates and cleans a chirp body.
///
/// Rejects bodies longer than [`MAX_CHIRP_LENGTH`] bytes, then redacts
/// denylisted words. Words are whatever sits between single spaces —
/// consecutive spaces produce empty words, which are preserved as-is, so
/// the original spacing survives redaction.
pub fn sanitize(body: &str) -> Result<String, ModerationError> {
    if body.len() > MAX_CHIRP_LENGTH {
        return Err(ModerationError::TooLong);
    }
    Ok(redact(body))
}

fn redact(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if denylist().contains(word.to_lowercase().as_str()) {
                REDACTED
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
