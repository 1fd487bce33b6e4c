//! Fixed-layout signed wrapper.
//!
//! ```text
//! [ header: len - 80 bytes, opaque ][ identity token: 16 bytes ][ signature: 64 bytes ]
//! ```
//!
//! The signature covers everything before it, header and token included. The
//! header is conventionally two 4-byte fields but is never interpreted here.

use thiserror::Error;

use crate::signature::SIGNATURE_LEN;
use crate::token::{IdentityToken, TOKEN_LEN};

/// Shortest wrapper accepted: signature, token, and at least 9 header bytes.
pub const MIN_ENVELOPE_LEN: usize = 89;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("envelope is {len} bytes, need at least 89")]
pub struct EnvelopeTooShortError {
    pub len: usize,
}

/// A wrapper split into its fields. Owns copies of the input bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEnvelope {
    signed_payload: Vec<u8>,
    identity_token: IdentityToken,
    signature: [u8; SIGNATURE_LEN],
}

impl ParsedEnvelope {
    /// Everything except the trailing signature; this is the signed message.
    pub fn signed_payload(&self) -> &[u8] {
        &self.signed_payload
    }

    /// The uninterpreted bytes in front of the identity token.
    pub fn header(&self) -> &[u8] {
        &self.signed_payload[..self.signed_payload.len() - TOKEN_LEN]
    }

    pub fn identity_token(&self) -> &IdentityToken {
        &self.identity_token
    }

    pub fn signature(&self) -> &[u8; SIGNATURE_LEN] {
        &self.signature
    }
}

pub fn parse(raw: &[u8]) -> Result<ParsedEnvelope, EnvelopeTooShortError> {
    if raw.len() < MIN_ENVELOPE_LEN {
        return Err(EnvelopeTooShortError { len: raw.len() });
    }
    let (signed_payload, signature_bytes) = raw.split_at(raw.len() - SIGNATURE_LEN);
    let (_, token_bytes) = signed_payload.split_at(signed_payload.len() - TOKEN_LEN);

    let mut signature = [0u8; SIGNATURE_LEN];
    signature.copy_from_slice(signature_bytes);
    let mut token = [0u8; TOKEN_LEN];
    token.copy_from_slice(token_bytes);

    Ok(ParsedEnvelope {
        signed_payload: signed_payload.to_vec(),
        identity_token: IdentityToken::new(token),
        signature,
    })
}
