//! Signature verification primitive
//!
//! Ed25519 over Curve25519, as the surrounding protocol defines signature
//! checks. A script can feed arbitrary byte vectors into `sigVerify`, so
//! malformed key or signature encodings verify as `false`, never as an
//! error.

use ed25519_dalek::{Signature, VerifyingKey, PUBLIC_KEY_LENGTH};

/// Verify `signature` over `message` with `public_key`.
pub fn verify_signature(message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    let key_bytes: [u8; PUBLIC_KEY_LENGTH] = match public_key.try_into() {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let key = match VerifyingKey::from_bytes(&key_bytes) {
        Ok(key) => key,
        Err(_) => return false,
    };
    let signature = match Signature::from_slice(signature) {
        Ok(signature) => signature,
        Err(_) => return false,
    };
    key.verify_strict(message, &signature).is_ok()
}
