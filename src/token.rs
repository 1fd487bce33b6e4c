use std::fmt;

#[cfg(test)]
use proptest_derive::Arbitrary;
use thiserror::Error;

use crate::util::{decode_hex, encode_hex, eq_ignore_case, MalformedHexError};

pub const TOKEN_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("identity token: {0}")]
    Hex(#[from] MalformedHexError),
    #[error("identity token must be 16 bytes, got {0}")]
    Length(usize),
}

/// The Device/Entity Token (DET) carried at the end of a wrapper's signed payload.
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct IdentityToken([u8; TOKEN_LEN]);

impl IdentityToken {
    pub fn new(bytes: [u8; TOKEN_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(text: &str) -> Result<Self, TokenError> {
        let bytes = decode_hex(text)?;
        let bytes: [u8; TOKEN_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| TokenError::Length(bytes.len()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; TOKEN_LEN] {
        &self.0
    }

    /// Lowercase hex, 32 characters.
    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }
}

impl fmt::Debug for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityToken({})", self.to_hex())
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Compares a decoded token (as hex) against the expected one, ignoring case.
pub fn token_matches(actual_hex: &str, expected_hex: &str) -> bool {
    eq_ignore_case(actual_hex, expected_hex)
}
