//! Conversion between hexadecimal text and raw bytes.

use ::hex::FromHexError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedHexError {
    #[error("hex text has odd length {len}")]
    OddLength { len: usize },
    #[error("invalid hex digit {character:?} at index {index}")]
    InvalidDigit { index: usize, character: char },
}

/// Decodes hex text (either case) into bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, MalformedHexError> {
    ::hex::decode(text).map_err(|err| match err {
        FromHexError::InvalidHexCharacter { c, index } => MalformedHexError::InvalidDigit {
            index,
            character: c,
        },
        FromHexError::OddLength | FromHexError::InvalidStringLength => {
            MalformedHexError::OddLength { len: text.len() }
        }
    })
}

/// Encodes bytes as lowercase, zero-padded hex.
pub fn encode(bytes: &[u8]) -> String {
    ::hex::encode(bytes)
}

/// Case-insensitive equality of two hex strings.
///
/// Not constant time: only ever used on public identifiers that have already
/// been authenticated.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.eq_ignore_ascii_case(b)
}
