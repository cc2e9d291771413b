//! Secret key generation.
//!
//! Produces base-36 shared secrets from the OS entropy source. The
//! conventional length for authenticator secrets is 16–32+ characters;
//! the algorithm places no upper bound.

use crate::otp::entropy;
use crate::otp::types::{OtpError, OtpErrorKind};

/// Bytes drawn per accumulation round; 48 bits fit comfortably in a u64.
const CHUNK_BYTES: usize = 6;

/// Default key length in characters.
pub const DEFAULT_KEY_LENGTH: u32 = 20;

/// Generate a secure random key of exactly `length` base-36 characters
/// (alphabet `0-9a-z`).
///
/// Each round draws six bytes from the OS CSPRNG, interprets them as a
/// big-endian integer, and appends its base-36 digits until the
/// accumulator covers the requested length. Entropy failure aborts with
/// no partial key.
pub fn generate_key(length: u32) -> Result<String, OtpError> {
    if length == 0 {
        return Err(OtpError::new(
            OtpErrorKind::InvalidLength,
            "Key length must be at least 1",
        ));
    }

    let target = length as usize;
    let mut acc = String::with_capacity(target + 10);
    while acc.len() < target {
        let chunk = entropy::random_bytes(CHUNK_BYTES)?;
        let mut value: u64 = 0;
        for byte in chunk {
            value = (value << 8) | byte as u64;
        }
        push_base36(&mut acc, value);
    }
    acc.truncate(target);
    Ok(acc)
}

/// Generate a key of the default length.
pub fn generate_default_key() -> Result<String, OtpError> {
    generate_key(DEFAULT_KEY_LENGTH)
}

/// Append the base-36 digits of `value` to `out`.
fn push_base36(out: &mut String, mut value: u64) {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        out.push('0');
        return;
    }
    let mut digits = [0u8; 13]; // u64 needs at most 13 base-36 digits
    let mut len = 0;
    while value > 0 {
        digits[len] = ALPHABET[(value % 36) as usize];
        value /= 36;
        len += 1;
    }
    for &d in digits[..len].iter().rev() {
        out.push(d as char);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_base36(s: &str) -> bool {
        s.bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
    }

    // ── generate_key ─────────────────────────────────────────────

    #[test]
    fn exact_length_and_alphabet() {
        for len in [1u32, 20, 64] {
            let key = generate_key(len).unwrap();
            assert_eq!(key.len(), len as usize);
            assert!(is_base36(&key), "unexpected character in {:?}", key);
        }
    }

    #[test]
    fn zero_length_is_rejected() {
        let err = generate_key(0).unwrap_err();
        assert_eq!(err.kind, OtpErrorKind::InvalidLength);
    }

    #[test]
    fn default_length_is_twenty() {
        let key = generate_default_key().unwrap();
        assert_eq!(key.len(), 20);
    }

    #[test]
    fn independent_keys_do_not_collide() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let key = generate_key(20).unwrap();
            assert!(seen.insert(key), "duplicate 20-char key");
        }
    }

    // ── push_base36 ──────────────────────────────────────────────

    #[test]
    fn base36_digits() {
        let mut s = String::new();
        push_base36(&mut s, 0);
        assert_eq!(s, "0");

        let mut s = String::new();
        push_base36(&mut s, 35);
        assert_eq!(s, "z");

        let mut s = String::new();
        push_base36(&mut s, 36);
        assert_eq!(s, "10");

        let mut s = String::new();
        push_base36(&mut s, 46655); // zzz
        assert_eq!(s, "zzz");
    }

    #[test]
    fn base36_max_chunk_value() {
        // 6 bytes of 0xff: 2^48 - 1 fits in at most 10 base-36 digits.
        let mut s = String::new();
        push_base36(&mut s, (1u64 << 48) - 1);
        assert!(is_base36(&s));
        assert!(s.len() <= 10);
    }
}
