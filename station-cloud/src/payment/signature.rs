//! Callback signature verification
//!
//! Callbacks carry a lowercase hex HMAC-SHA256 of the raw request body,
//! keyed by the webhook secret.

use hmac::{Hmac, Mac};
use http::HeaderMap;
use sha2::Sha256;

/// Header names accepted for the callback signature, in lookup order
pub const SIGNATURE_HEADERS: [&str; 2] = ["x-chapa-signature", "chapa-signature"];

/// First signature header present on the request
pub fn signature_header(headers: &HeaderMap) -> Option<&str> {
    SIGNATURE_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|v| v.to_str().ok())
}

/// Verify `signature` against `payload` in constant time
pub fn verify_signature(payload: &[u8], signature: &str, secret: &str) -> Result<(), &'static str> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(payload);

    let sig_bytes = hex::decode(signature.trim()).map_err(|_| "Invalid signature hex")?;
    mac.verify_slice(&sig_bytes)
        .map_err(|_| "Callback signature mismatch")
}

/// Hex HMAC-SHA256 of `payload` (used to sign test callbacks)
pub fn sign(payload: &[u8], secret: &str) -> Result<String, &'static str> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}
