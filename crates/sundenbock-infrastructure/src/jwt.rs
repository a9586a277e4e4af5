//! Bearer token payload decoding.
//!
//! Only the payload segment is decoded. Signatures are never verified here;
//! the backend validates every request.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use serde_json::{Map, Value};

use sundenbock_core::auth::{Claims, epoch_seconds};

/// Decodes the claims of a `header.payload.signature` token.
///
/// Returns `None` for anything that is not a three-segment token with a
/// base64url JSON object payload. Padded and unpadded payloads are accepted.
pub fn decode_claims(token: &str) -> Option<Claims> {
    decode_payload(token).map(Claims::from)
}

/// Expiry claim of a token in epoch seconds, if it can be read.
///
/// Read straight from the payload so other malformed claims never hide it.
pub fn decode_expiry(token: &str) -> Option<i64> {
    decode_payload(token)?.get("exp").and_then(epoch_seconds)
}

fn decode_payload(token: &str) -> Option<Map<String, Value>> {
    let payload = payload_segment(token)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(payload)) => Some(payload),
        Ok(_) => {
            tracing::debug!("Token payload is not a JSON object");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "Token payload is not JSON");
            None
        }
    }
}

fn payload_segment(token: &str) -> Option<&str> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || payload.is_empty() {
        return None;
    }
    Some(payload)
}

/// Builds an unsigned token around `claims`. Test helper for hosts that need
/// tokens without a backend.
pub fn encode_unsigned(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.")
}
