//! Identifier generation.
//!
//! An identifier is [`ID_BYTES`] bytes from the OS CSPRNG encoded as unpadded URL-safe
//! base64, which yields a [`ID_LEN`]-character token such as `q3Zk_w`.
//!
//! Identifiers are not guaranteed unique. With 32 bits of entropy the birthday bound is
//! roughly 77 000 ids for a 50% chance of at least one collision, so callers that must not
//! overwrite records check the durable tier first (see [`crate::cache::TieredStore::save`]).

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use thiserror::Error;

use crate::constants::{ID_BYTES, ID_LEN};

/// Errors raised while generating an identifier.
#[derive(Debug, Error)]
pub enum IdError {
    /// The OS randomness source failed. Not retriable.
    #[error("entropy source unavailable: {0}")]
    Entropy(#[from] rand::Error),
}

/// Generates a fresh, unpredictable identifier.
pub fn generate_id() -> Result<String, IdError> {
    let mut bytes = [0u8; ID_BYTES];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Returns `true` if `id` has the shape produced by [`generate_id`].
///
/// The gateway answers malformed ids as misses without consulting either tier.
#[inline]
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
