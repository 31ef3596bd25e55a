//! Time-based one-time passwords (RFC 6238, HMAC-SHA1, 6 digits).
//!
//! Secrets are generated here and stored on the user row; verification
//! accepts one period of clock drift in either direction.

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha1::Sha1;

use crate::core::error::{AppError, Result};

const DIGITS: u32 = 6;
const PERIOD: u64 = 30;
const WINDOW: i64 = 1;
const SECRET_BYTES: usize = 20;

/// Generate a new random shared secret, base64-encoded for storage.
pub fn generate_secret() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..SECRET_BYTES).map(|_| rng.gen()).collect();
    general_purpose::STANDARD.encode(&bytes)
}

/// Provisioning URI for authenticator apps.
pub fn otpauth_uri(issuer: &str, account_name: &str, secret: &str) -> String {
    format!(
        "otpauth://totp/{}:{}?secret={}&issuer={}&algorithm=SHA1&digits={}&period={}",
        urlencoding::encode(issuer),
        urlencoding::encode(account_name),
        urlencoding::encode(secret),
        urlencoding::encode(issuer),
        DIGITS,
        PERIOD
    )
}

/// The code valid at `unix_time` for the given secret.
pub fn code_at(secret: &str, unix_time: u64) -> Result<u32> {
    counter_code(secret, unix_time / PERIOD)
}

/// Render a code with leading zeros, as users type it.
pub fn format_code(code: u32) -> String {
    format!("{:0width$}", code, width = DIGITS as usize)
}

/// Verify a user-supplied code at `unix_time`, allowing `WINDOW` periods of
/// drift on each side. A malformed code is simply wrong, not an error.
pub fn verify(secret: &str, code: &str, unix_time: u64) -> Result<bool> {
    let Ok(code) = code.trim().parse::<u32>() else {
        return Ok(false);
    };

    let current_step = (unix_time / PERIOD) as i64;
    for offset in -WINDOW..=WINDOW {
        let step = current_step + offset;
        if step < 0 {
            continue;
        }
        if counter_code(secret, step as u64)? == code {
            return Ok(true);
        }
    }
    Ok(false)
}

fn counter_code(secret: &str, counter: u64) -> Result<u32> {
    let secret_bytes = general_purpose::STANDARD
        .decode(secret)
        .map_err(|e| AppError::Internal(format!("Stored TOTP secret is invalid: {}", e)))?;

    let mut mac = Hmac::<Sha1>::new_from_slice(&secret_bytes)
        .map_err(|e| AppError::Internal(format!("Failed to initialize HMAC: {}", e)))?;
    mac.update(&counter.to_be_bytes());
    let result = mac.finalize().into_bytes();

    // Dynamic truncation
    let offset = (result[19] & 0xf) as usize;
    let code = ((result[offset] & 0x7f) as u32) << 24
        | (result[offset + 1] as u32) << 16
        | (result[offset + 2] as u32) << 8
        | (result[offset + 3] as u32);

    Ok(code % 10u32.pow(DIGITS))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 20-byte reference key from RFC 6238, base64-encoded
    fn reference_secret() -> String {
        general_purpose::STANDARD.encode(b"12345678901234567890")
    }

    #[test]
    fn test_reference_vectors() {
        // RFC 6238 appendix B, truncated to 6 digits
        let secret = reference_secret();
        assert_eq!(code_at(&secret, 59).unwrap(), 287_082);
        assert_eq!(code_at(&secret, 1_111_111_109).unwrap(), 81_804);
        assert_eq!(code_at(&secret, 1_234_567_890).unwrap(), 5_924);
    }

    #[test]
    fn test_format_code_pads_leading_zeros() {
        assert_eq!(format_code(5_924), "005924");
        assert_eq!(format_code(287_082), "287082");
    }

    #[test]
    fn test_verify_accepts_adjacent_period() {
        let secret = reference_secret();
        let now = 1_234_567_890u64;
        let code = format_code(code_at(&secret, now).unwrap());

        assert!(verify(&secret, &code, now).unwrap());
        assert!(verify(&secret, &code, now + PERIOD).unwrap());
        assert!(!verify(&secret, &code, now + 3 * PERIOD).unwrap());
    }

    #[test]
    fn test_verify_rejects_wrong_and_malformed_codes() {
        let secret = reference_secret();
        let now = 1_234_567_890u64;

        assert!(!verify(&secret, "000001", now).unwrap());
        assert!(!verify(&secret, "abc123", now).unwrap());
        assert!(!verify(&secret, "", now).unwrap());
    }

    #[test]
    fn test_generated_secrets_are_unique_and_decodable() {
        let first = generate_secret();
        let second = generate_secret();
        assert_ne!(first, second);
        assert_eq!(
            general_purpose::STANDARD.decode(&first).unwrap().len(),
            SECRET_BYTES
        );
    }

    #[test]
    fn test_otpauth_uri_encodes_label() {
        let uri = otpauth_uri("Vademecum Jurídico", "ana@escritorio.br", "c2VjcmV0");
        assert!(uri.starts_with("otpauth://totp/Vademecum%20Jur%C3%ADdico:ana%40escritorio.br?"));
        assert!(uri.contains("digits=6"));
        assert!(uri.contains("period=30"));
    }
}
