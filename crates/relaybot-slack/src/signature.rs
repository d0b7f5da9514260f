//! Slack request signature verification.
//!
//! Implements Slack's published signing scheme: the base string is
//! `v0:<timestamp>:<raw body>`, HMAC-SHA256 keyed with the signing secret,
//! hex-encoded and prefixed as `v0=<hex>`. Requests older (or newer) than
//! the replay window are rejected before any hash is computed, as are
//! requests missing either header.
//!
//! The body must be the exact bytes received on the wire — re-serializing
//! the JSON before hashing breaks the signature.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Slack signature version token.
pub const SIGNATURE_VERSION: &str = "v0";

/// Maximum allowed clock skew, in seconds (Slack's documented 5 minutes).
pub const REPLAY_WINDOW_SECS: i64 = 300;

/// Why a request failed verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The timestamp header was absent.
    #[error("missing request timestamp header")]
    MissingTimestamp,

    /// The signature header was absent.
    #[error("missing request signature header")]
    MissingSignature,

    /// The timestamp header was not a number.
    #[error("malformed request timestamp")]
    MalformedTimestamp,

    /// The timestamp is outside the replay window (past or future).
    #[error("request timestamp outside the replay window")]
    StaleRequest,

    /// The supplied signature does not match the computed one.
    #[error("request signature mismatch")]
    SignatureMismatch,
}

impl SignatureError {
    /// Whether this failure is an authentication failure (HTTP 401) rather
    /// than a malformed request (HTTP 400).
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            SignatureError::StaleRequest | SignatureError::SignatureMismatch
        )
    }
}

// ─────────────────────────────────────────────
// SignatureVerifier
// ─────────────────────────────────────────────

/// Verifies that an inbound HTTP request genuinely originated from Slack
/// within the replay window.
///
/// Verification is a pure function of (secret, timestamp, signature, body,
/// clock) — the same inputs always produce the same result.
pub struct SignatureVerifier {
    signing_secret: String,
    replay_window_secs: i64,
}

impl SignatureVerifier {
    /// Create a verifier with the default 5-minute replay window.
    pub fn new(signing_secret: impl Into<String>) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            replay_window_secs: REPLAY_WINDOW_SECS,
        }
    }

    /// Verify a request against the current wall clock.
    pub fn verify(
        &self,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<(), SignatureError> {
        self.verify_at(Utc::now().timestamp(), timestamp, signature, body)
    }

    /// Verify a request against an explicit clock (unix seconds).
    pub fn verify_at(
        &self,
        now: i64,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<(), SignatureError> {
        // Missing headers reject before any hash is computed
        let timestamp = timestamp.ok_or(SignatureError::MissingTimestamp)?;
        let signature = signature.ok_or(SignatureError::MissingSignature)?;

        let ts: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| SignatureError::MalformedTimestamp)?;

        if (now - ts).abs() > self.replay_window_secs {
            return Err(SignatureError::StaleRequest);
        }

        let supplied_hex = signature
            .strip_prefix("v0=")
            .ok_or(SignatureError::SignatureMismatch)?;
        let supplied = hex::decode(supplied_hex).map_err(|_| SignatureError::SignatureMismatch)?;

        // hmac's verify_slice is constant-time, independent of which byte differs
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .map_err(|_| SignatureError::SignatureMismatch)?;
        mac.update(SIGNATURE_VERSION.as_bytes());
        mac.update(b":");
        mac.update(timestamp.as_bytes());
        mac.update(b":");
        mac.update(body);

        mac.verify_slice(&supplied)
            .map_err(|_| SignatureError::SignatureMismatch)
    }

    /// Compute the `v0=<hex>` signature for a (timestamp, body) pair.
    ///
    /// The counterpart of `verify` — used by tests and by anything that
    /// needs to produce Slack-compatible signatures.
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(SIGNATURE_VERSION.as_bytes());
        mac.update(b":");
        mac.update(timestamp.as_bytes());
        mac.update(b":");
        mac.update(body);
        format!(
            "{}={}",
            SIGNATURE_VERSION,
            hex::encode(mac.finalize().into_bytes())
        )
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
