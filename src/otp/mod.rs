//! OTP toolkit: sub-modules.

pub mod types;
pub mod core;
pub mod entropy;
pub mod keygen;
pub mod backup;
pub mod uri;

// Re-export top-level items for convenience.
pub use types::*;
pub use self::core::{
    base32_decode, base32_encode, generate_code, generate_totp_code, generate_totp_code_at,
    time_step, time_step_at, verify_hotp, verify_hotp_match, verify_totp, verify_totp_at,
    verify_totp_match, verify_totp_match_at,
};
pub use backup::{generate_backup_code, generate_backup_codes, DEFAULT_PATTERN};
pub use entropy::random_bytes;
pub use keygen::{generate_default_key, generate_key, DEFAULT_KEY_LENGTH};
pub use uri::{build_otpauth_uri, parse_otpauth_uri, provisioning_url, ProvisioningInfo};
