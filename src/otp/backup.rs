//! Backup-code generation.
//!
//! Produces human-readable recovery codes from a placeholder pattern:
//! every `x` in the pattern is replaced with a secure-random hex digit,
//! every other character passes through literally.

use crate::otp::entropy;
use crate::otp::types::{OtpError, OtpErrorKind};

/// Default backup-code pattern.
pub const DEFAULT_PATTERN: &str = "xxxx-xxxx";

/// Character in the pattern marking a position to fill.
const PLACEHOLDER: char = 'x';

/// Generate a single backup code against `pattern`.
///
/// Draws `ceil(placeholders / 2)` bytes from the OS CSPRNG (one byte
/// hex-encodes to two digits) and substitutes the digits left-to-right.
/// A pattern with no placeholders is rejected.
pub fn generate_backup_code(pattern: &str) -> Result<String, OtpError> {
    let placeholders = pattern.chars().filter(|&c| c == PLACEHOLDER).count();
    if placeholders == 0 {
        return Err(OtpError::new(
            OtpErrorKind::InvalidPattern,
            "Pattern contains no 'x' placeholders",
        ));
    }

    let bytes = entropy::random_bytes(placeholders.div_ceil(2))?;
    let hex_digits: Vec<char> = hex::encode(&bytes).chars().collect();

    let mut next = 0;
    let code = pattern
        .chars()
        .map(|c| {
            if c == PLACEHOLDER {
                let digit = hex_digits[next];
                next += 1;
                digit
            } else {
                c
            }
        })
        .collect();
    Ok(code)
}

/// Generate `count` independently random backup codes.
///
/// Codes are independent draws; the batch carries no uniqueness
/// guarantee, though collisions are improbable for reasonable patterns.
pub fn generate_backup_codes(count: u32, pattern: &str) -> Result<Vec<String>, OtpError> {
    if count == 0 {
        return Err(OtpError::new(
            OtpErrorKind::InvalidLength,
            "Backup-code count must be at least 1",
        ));
    }
    (0..count).map(|_| generate_backup_code(pattern)).collect()
}
