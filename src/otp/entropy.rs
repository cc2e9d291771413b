//! Secure random-byte acquisition.
//!
//! All security-critical output in this crate (keys, backup codes) draws
//! from the operating system's CSPRNG. A failing entropy source is
//! surfaced as `EntropyFailure`; there is no fallback to a weaker source.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::otp::types::{OtpError, OtpErrorKind};

/// Fill a fresh buffer with `len` bytes from the OS entropy source.
///
/// Returns `EntropyFailure` if the source is unavailable; no partial
/// buffer is ever returned.
pub fn random_bytes(len: usize) -> Result<Vec<u8>, OtpError> {
    let mut buf = vec![0u8; len];
    OsRng.try_fill_bytes(&mut buf).map_err(|e| {
        OtpError::new(OtpErrorKind::EntropyFailure, "OS entropy source unavailable")
            .with_detail(e.to_string())
    })?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── random_bytes ─────────────────────────────────────────────

    #[test]
    fn requested_length_is_honoured() {
        for len in [0, 1, 6, 32, 1024] {
            let bytes = random_bytes(len).unwrap();
            assert_eq!(bytes.len(), len);
        }
    }

    #[test]
    fn independent_draws_differ() {
        // 32 random bytes colliding would indicate a broken source.
        let a = random_bytes(32).unwrap();
        let b = random_bytes(32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn output_is_not_all_zero() {
        let bytes = random_bytes(64).unwrap();
        assert!(bytes.iter().any(|&b| b != 0));
    }
}
