//! Core types for the OTP toolkit.

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Algorithm
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Hash algorithm used for HMAC-based OTP.
///
/// SHA-1 is the RFC 4226 baseline understood by every authenticator app;
/// SHA-256 and SHA-512 cover the RFC 6238 extended suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Sha1
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "SHA1"),
            Self::Sha256 => write!(f, "SHA256"),
            Self::Sha512 => write!(f, "SHA512"),
        }
    }
}

impl Algorithm {
    /// Parse from a case-insensitive string.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SHA1" | "SHA-1" | "HMACSHA1" | "HMAC-SHA1" => Some(Self::Sha1),
            "SHA256" | "SHA-256" | "HMACSHA256" | "HMAC-SHA256" => Some(Self::Sha256),
            "SHA512" | "SHA-512" | "HMACSHA512" | "HMAC-SHA512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// URI-safe name for `otpauth://` parameters.
    pub fn uri_name(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  OTP kind
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Whether a provisioning URI describes a time-based or counter-based OTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpKind {
    Totp,
    Hotp,
}

impl Default for OtpKind {
    fn default() -> Self {
        Self::Totp
    }
}

impl fmt::Display for OtpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Totp => write!(f, "totp"),
            Self::Hotp => write!(f, "hotp"),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Code generation options
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Options for generating a code.
///
/// Defaults match what authenticator apps assume when a provisioning URI
/// omits the corresponding parameters: 6 digits, 30-second step, SHA-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeOptions {
    /// Number of digits in the generated code (6, 7, or 8).
    pub digits: u8,
    /// Time-step size in seconds (TOTP only).
    pub step: u32,
    /// HMAC hash algorithm.
    pub algorithm: Algorithm,
}

impl Default for CodeOptions {
    fn default() -> Self {
        Self {
            digits: 6,
            step: 30,
            algorithm: Algorithm::Sha1,
        }
    }
}

impl CodeOptions {
    /// Builder: set digit count.
    pub fn with_digits(mut self, digits: u8) -> Self {
        self.digits = digits;
        self
    }

    /// Builder: set time-step size.
    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    /// Builder: set hash algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Verification options
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Options for verifying a received code against a counter or time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOptions {
    /// Combined drift budget in counter steps, split evenly across both
    /// directions when `before_drift` / `after_drift` are unset.
    ///
    /// The split is `drift / 2` with integer division, so an odd value
    /// floors on both sides: `drift: 3` accepts one step before and one
    /// step after. Callers that want the odd extra step set the explicit
    /// per-direction bound instead.
    pub drift: u32,
    /// Steps accepted before the expected counter; overrides the `drift`
    /// split when set.
    pub before_drift: Option<u32>,
    /// Steps accepted after the expected counter; overrides the `drift`
    /// split when set.
    pub after_drift: Option<u32>,
    /// Expected number of digits in the received code.
    pub digits: u8,
    /// Time-step size in seconds (TOTP only).
    pub step: u32,
    /// HMAC hash algorithm.
    pub algorithm: Algorithm,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            drift: 0,
            before_drift: None,
            after_drift: None,
            digits: 6,
            step: 30,
            algorithm: Algorithm::Sha1,
        }
    }
}

impl VerifyOptions {
    /// Builder: set the combined drift budget.
    pub fn with_drift(mut self, drift: u32) -> Self {
        self.drift = drift;
        self
    }

    /// Builder: set the backward drift bound.
    pub fn with_before_drift(mut self, before: u32) -> Self {
        self.before_drift = Some(before);
        self
    }

    /// Builder: set the forward drift bound.
    pub fn with_after_drift(mut self, after: u32) -> Self {
        self.after_drift = Some(after);
        self
    }

    /// Builder: set expected digit count.
    pub fn with_digits(mut self, digits: u8) -> Self {
        self.digits = digits;
        self
    }

    /// Builder: set time-step size.
    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    /// Builder: set hash algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Steps searched before the expected counter.
    pub fn window_before(&self) -> u64 {
        self.before_drift.unwrap_or(self.drift / 2) as u64
    }

    /// Steps searched after the expected counter.
    pub fn window_after(&self) -> u64 {
        self.after_drift.unwrap_or(self.drift / 2) as u64
    }

    /// The generation options implied by these verify options.
    pub fn code_options(&self) -> CodeOptions {
        CodeOptions {
            digits: self.digits,
            step: self.step,
            algorithm: self.algorithm,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Verification match
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A successful verification, with the counter that produced the match.
///
/// Callers that resynchronize HOTP counters use `counter` as the new
/// high-water mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyMatch {
    /// The counter value that matched.
    pub counter: u64,
    /// Signed distance from the expected counter (0 = exact).
    pub drift: i64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Error type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Error kind for this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtpErrorKind {
    /// The OS entropy source failed; never substituted with a weaker one.
    EntropyFailure,
    /// Backup-code pattern contains no placeholder positions.
    InvalidPattern,
    /// Requested key or batch length is zero.
    InvalidLength,
    /// Secret is not valid base-32.
    InvalidSecret,
    /// Provisioning URI is malformed.
    InvalidUri,
}

/// Crate-level error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpError {
    pub kind: OtpErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

impl fmt::Display for OtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(d) = &self.detail {
            write!(f, " ({})", d)?;
        }
        Ok(())
    }
}

impl OtpError {
    pub fn new(kind: OtpErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<OtpError> for String {
    fn from(e: OtpError) -> String {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Algorithm ────────────────────────────────────────────────

    #[test]
    fn algorithm_default_is_sha1() {
        assert_eq!(Algorithm::default(), Algorithm::Sha1);
    }

    #[test]
    fn algorithm_display() {
        assert_eq!(Algorithm::Sha1.to_string(), "SHA1");
        assert_eq!(Algorithm::Sha256.to_string(), "SHA256");
        assert_eq!(Algorithm::Sha512.to_string(), "SHA512");
    }

    #[test]
    fn algorithm_from_str_loose() {
        assert_eq!(Algorithm::from_str_loose("sha1"), Some(Algorithm::Sha1));
        assert_eq!(Algorithm::from_str_loose("SHA-256"), Some(Algorithm::Sha256));
        assert_eq!(Algorithm::from_str_loose("HMAC-SHA512"), Some(Algorithm::Sha512));
        assert_eq!(Algorithm::from_str_loose("MD5"), None);
    }

    #[test]
    fn algorithm_serde_roundtrip() {
        let algo = Algorithm::Sha256;
        let json = serde_json::to_string(&algo).unwrap();
        assert_eq!(json, "\"SHA256\"");
        let back: Algorithm = serde_json::from_str(&json).unwrap();
        assert_eq!(back, algo);
    }

    // ── OtpKind ──────────────────────────────────────────────────

    #[test]
    fn otp_kind_default() {
        assert_eq!(OtpKind::default(), OtpKind::Totp);
    }

    #[test]
    fn otp_kind_display() {
        assert_eq!(OtpKind::Totp.to_string(), "totp");
        assert_eq!(OtpKind::Hotp.to_string(), "hotp");
    }

    // ── CodeOptions ──────────────────────────────────────────────

    #[test]
    fn code_options_defaults() {
        let opts = CodeOptions::default();
        assert_eq!(opts.digits, 6);
        assert_eq!(opts.step, 30);
        assert_eq!(opts.algorithm, Algorithm::Sha1);
    }

    #[test]
    fn code_options_builder() {
        let opts = CodeOptions::default()
            .with_digits(8)
            .with_step(60)
            .with_algorithm(Algorithm::Sha512);
        assert_eq!(opts.digits, 8);
        assert_eq!(opts.step, 60);
        assert_eq!(opts.algorithm, Algorithm::Sha512);
    }

    // ── VerifyOptions ────────────────────────────────────────────

    #[test]
    fn verify_options_defaults() {
        let opts = VerifyOptions::default();
        assert_eq!(opts.drift, 0);
        assert_eq!(opts.window_before(), 0);
        assert_eq!(opts.window_after(), 0);
        assert_eq!(opts.digits, 6);
        assert_eq!(opts.step, 30);
    }

    #[test]
    fn verify_options_drift_splits_evenly() {
        let opts = VerifyOptions::default().with_drift(4);
        assert_eq!(opts.window_before(), 2);
        assert_eq!(opts.window_after(), 2);
    }

    #[test]
    fn verify_options_odd_drift_floors() {
        let opts = VerifyOptions::default().with_drift(3);
        assert_eq!(opts.window_before(), 1);
        assert_eq!(opts.window_after(), 1);
    }

    #[test]
    fn verify_options_explicit_bounds_override_drift() {
        let opts = VerifyOptions::default()
            .with_drift(10)
            .with_before_drift(0)
            .with_after_drift(2);
        assert_eq!(opts.window_before(), 0);
        assert_eq!(opts.window_after(), 2);
    }

    #[test]
    fn verify_options_to_code_options() {
        let opts = VerifyOptions::default()
            .with_digits(8)
            .with_step(60)
            .with_algorithm(Algorithm::Sha256);
        let code_opts = opts.code_options();
        assert_eq!(code_opts.digits, 8);
        assert_eq!(code_opts.step, 60);
        assert_eq!(code_opts.algorithm, Algorithm::Sha256);
    }

    // ── VerifyMatch ──────────────────────────────────────────────

    #[test]
    fn verify_match_serde() {
        let m = VerifyMatch {
            counter: 100,
            drift: -1,
        };
        let json = serde_json::to_string(&m).unwrap();
        let back: VerifyMatch = serde_json::from_str(&json).unwrap();
        assert_eq!(back.counter, 100);
        assert_eq!(back.drift, -1);
    }

    // ── Error ────────────────────────────────────────────────────

    #[test]
    fn error_display() {
        let err = OtpError::new(OtpErrorKind::InvalidSecret, "bad base32")
            .with_detail("extra info");
        let s = err.to_string();
        assert!(s.contains("InvalidSecret"));
        assert!(s.contains("bad base32"));
        assert!(s.contains("extra info"));
    }

    #[test]
    fn error_into_string() {
        let err = OtpError::new(OtpErrorKind::EntropyFailure, "entropy pool");
        let s: String = err.into();
        assert!(s.contains("EntropyFailure"));
    }
}
