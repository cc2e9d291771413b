//! Core OTP generation and verification — RFC 4226 (HOTP) and RFC 6238
//! (TOTP).
//!
//! Implements HMAC-based One-Time Password with SHA-1, SHA-256, and
//! SHA-512, time-step calculation, and code verification against a
//! configurable drift window searched before and after the expected
//! counter. Keys are raw bytes throughout; base-32 encoding belongs to
//! the provisioning layer and lives in the codec helpers at the bottom.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::otp::types::*;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HOTP (counter-based, RFC 4226)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute an HOTP code for the given key bytes and counter.
///
/// Deterministic in `(key, counter, opts)`: the counter is encoded as an
/// 8-byte big-endian integer, HMAC'd with the key, dynamically truncated
/// per RFC 4226 §5.3, and reduced to `opts.digits` zero-padded decimal
/// digits.
pub fn generate_code(key: &[u8], counter: u64, opts: &CodeOptions) -> String {
    let digest = compute_hmac(key, &counter.to_be_bytes(), opts.algorithm);
    truncate(&digest, opts.digits)
}

/// Compute HMAC(key, message) using the specified algorithm.
fn compute_hmac(key: &[u8], data: &[u8], algo: Algorithm) -> Vec<u8> {
    match algo {
        Algorithm::Sha1 => {
            let mut mac =
                Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha256 => {
            let mut mac =
                Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha512 => {
            let mut mac =
                Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
    }
}

/// Dynamic truncation per RFC 4226 §5.3.
fn truncate(digest: &[u8], digits: u8) -> String {
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = ((digest[offset] as u32 & 0x7f) << 24)
        | ((digest[offset + 1] as u32) << 16)
        | ((digest[offset + 2] as u32) << 8)
        | (digest[offset + 3] as u32);
    let modulus = 10u32.pow(digits as u32);
    let code = binary % modulus;
    format!("{:0>width$}", code, width = digits as usize)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TOTP (time-based, RFC 6238)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute the current TOTP time-step counter.
pub fn time_step(step: u32) -> u64 {
    time_step_at(current_unix_time(), step)
}

/// Compute the time-step counter for a given unix timestamp.
pub fn time_step_at(unix_seconds: u64, step: u32) -> u64 {
    unix_seconds / step as u64
}

/// Generate a TOTP code at the current time.
pub fn generate_totp_code(key: &[u8], opts: &CodeOptions) -> String {
    generate_totp_code_at(key, current_unix_time(), opts)
}

/// Generate a TOTP code at an explicit unix timestamp.
pub fn generate_totp_code_at(key: &[u8], unix_seconds: u64, opts: &CodeOptions) -> String {
    generate_code(key, time_step_at(unix_seconds, opts.step), opts)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Verification
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Verify a received code against an HOTP counter.
///
/// The drift window extends `opts.window_before()` steps below and
/// `opts.window_after()` steps above `counter`; see `VerifyOptions::drift`
/// for how a combined budget splits.
pub fn verify_hotp(key: &[u8], code: &str, counter: u64, opts: &VerifyOptions) -> bool {
    verify_hotp_match(key, code, counter, opts).is_some()
}

/// Verify a received code against an HOTP counter, returning the matched
/// counter and its drift on success.
///
/// The window is searched in ascending counter order and the first match
/// wins, so the result is deterministic. The received code must be
/// exactly `opts.digits` ASCII digits; comparison is constant-time.
pub fn verify_hotp_match(
    key: &[u8],
    code: &str,
    counter: u64,
    opts: &VerifyOptions,
) -> Option<VerifyMatch> {
    if code.len() != opts.digits as usize || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let code_opts = opts.code_options();
    let start = counter.saturating_sub(opts.window_before());
    let end = counter.saturating_add(opts.window_after());

    for c in start..=end {
        let generated = generate_code(key, c, &code_opts);
        if constant_time_eq(generated.as_bytes(), code.as_bytes()) {
            let drift = c.wrapping_sub(counter) as i64;
            if drift != 0 {
                log::debug!("code accepted {} steps off-center", drift);
            }
            return Some(VerifyMatch { counter: c, drift });
        }
    }

    None
}

/// Verify a received code against the current TOTP time window.
pub fn verify_totp(key: &[u8], code: &str, opts: &VerifyOptions) -> bool {
    verify_totp_at(key, code, current_unix_time(), opts)
}

/// Verify a TOTP code at an explicit unix timestamp.
pub fn verify_totp_at(key: &[u8], code: &str, unix_seconds: u64, opts: &VerifyOptions) -> bool {
    verify_totp_match_at(key, code, unix_seconds, opts).is_some()
}

/// Verify a TOTP code at the current time, returning match details.
pub fn verify_totp_match(key: &[u8], code: &str, opts: &VerifyOptions) -> Option<VerifyMatch> {
    verify_totp_match_at(key, code, current_unix_time(), opts)
}

/// Verify a TOTP code at an explicit timestamp, returning match details.
pub fn verify_totp_match_at(
    key: &[u8],
    code: &str,
    unix_seconds: u64,
    opts: &VerifyOptions,
) -> Option<VerifyMatch> {
    let counter = time_step_at(unix_seconds, opts.step);
    verify_hotp_match(key, code, counter, opts)
}

/// Constant-time comparison (to prevent timing attacks on code verification).
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Current unix timestamp in seconds.
fn current_unix_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Base-32 codec (RFC 4648)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Encode raw bytes to base-32 (uppercase, padding stripped).
///
/// Authenticator apps expect unpadded secrets in provisioning URIs.
pub fn base32_encode(data: &[u8]) -> String {
    base32::encode(base32::Alphabet::Rfc4648 { padding: false }, data)
}

/// Decode a base-32 secret (with or without spaces/dashes/padding,
/// case-insensitive).
pub fn base32_decode(s: &str) -> Result<Vec<u8>, OtpError> {
    let cleaned = s.replace(' ', "").replace('-', "").to_uppercase();
    let padded = pad_base32(&cleaned);
    base32::decode(base32::Alphabet::Rfc4648 { padding: true }, &padded)
        .or_else(|| base32::decode(base32::Alphabet::Rfc4648 { padding: false }, &cleaned))
        .ok_or_else(|| OtpError::new(OtpErrorKind::InvalidSecret, "Invalid base-32 secret"))
}

/// Pad a base-32 string to a multiple of 8 with '='.
fn pad_base32(s: &str) -> String {
    let remainder = s.len() % 8;
    if remainder == 0 {
        s.to_string()
    } else {
        let pad_count = 8 - remainder;
        format!("{}{}", s, "=".repeat(pad_count))
    }
}
