//! # twofa – Two-Factor OTP Toolkit
//!
//! Time-based and counter-based one-time password crate:
//!
//! - **RFC 4226 / 6238** – HOTP & TOTP generation with SHA-1, SHA-256, SHA-512
//! - **Drift windows** – Verification with a configurable before/after tolerance
//! - **otpauth:// URIs** – Provisioning-URL generation & parsing per the Google
//!   Authenticator spec
//! - **Key generation** – Secure base-36 shared secrets from the OS CSPRNG
//! - **Backup codes** – Patterned hex recovery codes (e.g. `xxxx-xxxx`)

pub mod otp;
