//! `otpauth://` provisioning-URL generation and parsing per the Google
//! Authenticator key-URI format:
//! <https://github.com/google/google-authenticator/wiki/Key-Uri-Format>
//!
//! Generation follows the shape authenticator apps import:
//! `otpauth://totp/ACCOUNT?issuer=SERVICE&secret=BASE32`

use serde::{Deserialize, Serialize};

use crate::otp::core;
use crate::otp::types::*;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Generate
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Build a TOTP provisioning URL for an authenticator app.
///
/// Produces exactly
/// `otpauth://totp/<account>?issuer=<service>&secret=<base32 key>`, with
/// account and service percent-encoded and the secret unpadded. Inputs
/// are not validated beyond the encoding.
pub fn provisioning_url(service: &str, account: &str, key: &[u8]) -> String {
    format!(
        "otpauth://totp/{}?issuer={}&secret={}",
        url_encode(account),
        url_encode(service),
        core::base32_encode(key)
    )
}

/// Build a full `otpauth://` URI from parsed provisioning info.
///
/// Parameters matching the authenticator defaults (SHA-1, 6 digits,
/// 30-second period) are omitted, mirroring what most exporters emit.
pub fn build_otpauth_uri(info: &ProvisioningInfo) -> String {
    let label = url_encode(&info.account);
    let path = match &info.issuer {
        Some(iss) if !iss.is_empty() => format!("{}:{}", url_encode(iss), label),
        _ => label,
    };

    let mut params = vec![format!("secret={}", info.secret)];
    if let Some(ref iss) = info.issuer {
        params.push(format!("issuer={}", url_encode(iss)));
    }
    if info.algorithm != Algorithm::Sha1 {
        params.push(format!("algorithm={}", info.algorithm.uri_name()));
    }
    if info.digits != 6 {
        params.push(format!("digits={}", info.digits));
    }
    if info.kind == OtpKind::Totp && info.step != 30 {
        params.push(format!("period={}", info.step));
    }
    if info.kind == OtpKind::Hotp {
        params.push(format!("counter={}", info.counter));
    }

    format!("otpauth://{}/{}?{}", info.kind, path, params.join("&"))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Provisioning info
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The fields carried by an `otpauth://` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningInfo {
    /// Time-based or counter-based.
    pub kind: OtpKind,
    /// Issuing service, if present.
    pub issuer: Option<String>,
    /// Account label (e.g. "user@example.com").
    pub account: String,
    /// Base-32 encoded secret.
    pub secret: String,
    /// HMAC hash algorithm.
    pub algorithm: Algorithm,
    /// Code digit count.
    pub digits: u8,
    /// Time-step size in seconds (TOTP).
    pub step: u32,
    /// Counter value (HOTP).
    pub counter: u64,
}

impl ProvisioningInfo {
    /// Create TOTP info with authenticator defaults.
    pub fn new(account: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            kind: OtpKind::Totp,
            issuer: None,
            account: account.into(),
            secret: secret.into(),
            algorithm: Algorithm::Sha1,
            digits: 6,
            step: 30,
            counter: 0,
        }
    }

    /// Builder: set issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Decode the secret to raw key bytes.
    pub fn key(&self) -> Result<Vec<u8>, OtpError> {
        core::base32_decode(&self.secret)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Parse
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Parse an `otpauth://` URI into `ProvisioningInfo`.
pub fn parse_otpauth_uri(uri: &str) -> Result<ProvisioningInfo, OtpError> {
    let url = url::Url::parse(uri)
        .map_err(|e| OtpError::new(OtpErrorKind::InvalidUri, format!("Invalid URI: {}", e)))?;

    if url.scheme() != "otpauth" {
        return Err(OtpError::new(
            OtpErrorKind::InvalidUri,
            format!("Expected scheme 'otpauth', got '{}'", url.scheme()),
        ));
    }

    let kind = match url.host_str() {
        Some("totp") => OtpKind::Totp,
        Some("hotp") => OtpKind::Hotp,
        other => {
            return Err(OtpError::new(
                OtpErrorKind::InvalidUri,
                format!("Unknown OTP type: {:?}", other),
            ))
        }
    };

    // Path is "/LABEL" or "/ISSUER:LABEL"
    let path = url.path();
    let path = path.strip_prefix('/').unwrap_or(path);
    let path_decoded = url_decode(path);

    let (path_issuer, account) = if let Some(colon_pos) = path_decoded.find(':') {
        let issuer = path_decoded[..colon_pos].trim().to_string();
        let account = path_decoded[colon_pos + 1..].trim().to_string();
        (Some(issuer), account)
    } else {
        (None, path_decoded)
    };

    let mut secret = None;
    let mut param_issuer = None;
    let mut algorithm = Algorithm::Sha1;
    let mut digits = 6u8;
    let mut step = 30u32;
    let mut counter = 0u64;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "secret" => secret = Some(value.to_string()),
            "issuer" => param_issuer = Some(value.to_string()),
            "algorithm" => {
                if let Some(algo) = Algorithm::from_str_loose(&value) {
                    algorithm = algo;
                }
            }
            "digits" => {
                if let Ok(d) = value.parse::<u8>() {
                    if (6..=8).contains(&d) {
                        digits = d;
                    }
                }
            }
            "period" => {
                if let Ok(p) = value.parse::<u32>() {
                    if p > 0 {
                        step = p;
                    }
                }
            }
            "counter" => {
                if let Ok(c) = value.parse::<u64>() {
                    counter = c;
                }
            }
            _ => {} // ignore unknown params
        }
    }

    let secret = secret
        .ok_or_else(|| OtpError::new(OtpErrorKind::InvalidUri, "Missing 'secret' parameter"))?;

    Ok(ProvisioningInfo {
        kind,
        // Prefer issuer from query param, then from path prefix
        issuer: param_issuer.or(path_issuer),
        account,
        secret,
        algorithm,
        digits,
        step,
        counter,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  URL encoding helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn url_encode(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                output.push(byte as char);
            }
            b' ' => output.push_str("%20"),
            b'@' => output.push_str("%40"),
            _ => output.push_str(&format!("%{:02X}", byte)),
        }
    }
    output
}

fn url_decode(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                result.push(byte as char);
            } else {
                result.push('%');
                result.push_str(&hex);
            }
        } else if c == '+' {
            result.push(' ');
        } else {
            result.push(c);
        }
    }
    result
}
