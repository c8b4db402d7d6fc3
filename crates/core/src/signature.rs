//! Ghost webhook signature verification.
//!
//! Ghost signs each delivery with an `X-Ghost-Signature` header of the
//! form `sha256=<hex digest>, t=<unix millis>`. The digest is
//! HMAC-SHA256 over the raw body with the timestamp appended, keyed by
//! the webhook's shared secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the Ghost signature.
pub const SIGNATURE_HEADER: &str = "x-ghost-signature";

/// Number of characters of the secret left visible when masking.
const MASK_VISIBLE_CHARS: usize = 4;

/// Verify a Ghost webhook signature header against the raw body.
///
/// Returns `false` on any malformed header rather than erroring; the
/// caller treats every non-verifying delivery the same way.
pub fn verify_signature(header: &str, body: &[u8], secret: &str) -> bool {
    let Some((sig_part, ts_part)) = header.split_once(", ") else {
        return false;
    };
    let Some(received) = sig_part.strip_prefix("sha256=") else {
        return false;
    };
    let Some(timestamp) = ts_part.strip_prefix("t=") else {
        return false;
    };

    let mut payload = body.to_vec();
    payload.extend_from_slice(timestamp.as_bytes());

    received == compute_signature(&payload, secret)
}

/// Compute the hex HMAC-SHA256 digest of `payload` keyed by `secret`.
pub fn compute_signature(payload: &[u8], secret: &str) -> String {
    // HMAC accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC key of any length is valid");
    mac.update(payload);
    let digest = mac.finalize().into_bytes();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Build a signature header for a body, as Ghost would.
///
/// Used by tests and by operators generating synthetic deliveries.
pub fn sign(body: &[u8], secret: &str, timestamp_millis: i64) -> String {
    let mut payload = body.to_vec();
    payload.extend_from_slice(timestamp_millis.to_string().as_bytes());
    format!(
        "sha256={}, t={timestamp_millis}",
        compute_signature(&payload, secret)
    )
}

/// Generate a random webhook secret (32 hex chars).
pub fn generate_secret() -> String {
    let bytes: [u8; 16] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Mask a secret for display, leaving only the last few characters.
pub fn mask_secret(secret: &str) -> String {
    if secret.len() <= MASK_VISIBLE_CHARS {
        return "*".repeat(secret.len());
    }
    let visible = &secret[secret.len() - MASK_VISIBLE_CHARS..];
    format!("{}{visible}", "*".repeat(secret.len() - MASK_VISIBLE_CHARS))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";
    const BODY: &[u8] = br#"{"member":{"current":{"email":"a@b.c"}}}"#;

    #[test]
    fn accepts_correctly_signed_body() {
        let header = sign(BODY, SECRET, 1_700_000_000_000);
        assert!(verify_signature(&header, BODY, SECRET));
    }

    #[test]
    fn rejects_tampered_body() {
        let header = sign(BODY, SECRET, 1_700_000_000_000);
        assert!(!verify_signature(&header, b"{}", SECRET));
    }

    #[test]
    fn rejects_wrong_secret() {
        let header = sign(BODY, SECRET, 1_700_000_000_000);
        assert!(!verify_signature(&header, BODY, "other-secret"));
    }

    #[test]
    fn rejects_malformed_headers() {
        for bad in [
            "",
            "sha256=abc",
            "abc, t=123",
            "sha256=abc t=123",
            "md5=abc, t=123",
            "sha256=abc, ts=123",
        ] {
            assert!(!verify_signature(bad, BODY, SECRET), "{bad:?} accepted");
        }
    }

    #[test]
    fn generated_secrets_are_distinct() {
        let a = generate_secret();
        let b = generate_secret();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn masks_all_but_last_four() {
        assert_eq!(mask_secret("abcdef123456"), "********3456");
        assert_eq!(mask_secret("abc"), "***");
    }
}
