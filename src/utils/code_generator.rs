//! Short code generation and validation utilities.
//!
//! Random codes mix ASCII letters and digits and always contain at least one
//! of each. Custom codes are user-supplied and validated against a fixed
//! pattern.

use std::sync::LazyLock;

use crate::error::AppError;
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use serde_json::json;

/// Length of generated codes before any collision fallback.
pub const DEFAULT_CODE_LENGTH: usize = 5;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Codes that would shadow fixed single-segment routes.
const RESERVED_CODES: &[&str] = &["shorten", "health"];

static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{5,30}$").expect("custom code regex is valid"));

/// Errors raised by [`generate_code`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodeGenError {
    #[error("Length must be at least 2 to include both letter and digit, got {0}")]
    LengthTooShort(usize),
}

/// Generates a random code of `length` characters.
///
/// The code contains at least one letter and one digit; the remaining
/// characters are drawn from letters and digits and all positions are
/// shuffled.
///
/// # Errors
///
/// Returns [`CodeGenError::LengthTooShort`] if `length < 2`.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(5)?;
/// assert_eq!(code.len(), 5);
/// ```
pub fn generate_code(length: usize) -> Result<String, CodeGenError> {
    if length < 2 {
        return Err(CodeGenError::LengthTooShort(length));
    }

    let mut rng = rand::rng();
    let mut code = Vec::with_capacity(length);

    code.push(LETTERS[rng.random_range(0..LETTERS.len())]);
    code.push(DIGITS[rng.random_range(0..DIGITS.len())]);
    for _ in 2..length {
        code.push(ALPHANUMERIC[rng.random_range(0..ALPHANUMERIC.len())]);
    }
    code.shuffle(&mut rng);

    Ok(code.into_iter().map(char::from).collect())
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - 5-30 characters
/// - Letters, digits, hyphens and underscores only
/// - Not a reserved route name
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::bad_request(
            "Custom short code must be 5-30 characters and only use letters, digits, hyphens, or underscores.",
            json!({ "custom_code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "custom_code": code }),
        ));
    }

    Ok(())
}
