use std::num::NonZeroUsize;

use thiserror::Error;

use crate::dataset::DatasetSpec;
use crate::samples;
use crate::signature::PUBLIC_KEY_LEN;
use crate::token::{IdentityToken, TokenError};
use crate::util::{decode_hex, MalformedHexError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("public key: {0}")]
    PublicKeyHex(#[source] MalformedHexError),
    #[error("public key must be 32 bytes, got {0}")]
    PublicKeyLength(usize),
    #[error(transparent)]
    ExpectedToken(#[from] TokenError),
    #[error("wrapper: {0}")]
    WrapperHex(#[source] MalformedHexError),
}

/// Everything a benchmark run needs, already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub public_key: [u8; PUBLIC_KEY_LEN],
    /// Kept as given; compared case-insensitively.
    pub expected_token: String,
    pub wrapper: Vec<u8>,
    pub dataset: DatasetSpec,
    /// `None` means one worker per available CPU.
    pub workers: Option<NonZeroUsize>,
}

impl BenchConfig {
    /// Decodes the hex inputs, with default dataset shape and worker count.
    pub fn from_hex(
        public_key: &str,
        expected_token: &str,
        wrapper: &str,
    ) -> Result<Self, ConfigError> {
        IdentityToken::from_hex(expected_token)?;
        Ok(Self {
            public_key: public_key_from_bytes(
                &decode_hex(public_key).map_err(ConfigError::PublicKeyHex)?,
            )?,
            expected_token: expected_token.to_string(),
            wrapper: decode_hex(wrapper).map_err(ConfigError::WrapperHex)?,
            dataset: DatasetSpec::default(),
            workers: None,
        })
    }

    /// The bundled sample wrapper and its key.
    pub fn sample() -> Result<Self, ConfigError> {
        Self::from_hex(
            samples::PUBLIC_KEY_HEX,
            samples::DET_HEX,
            samples::WRAPPER_HEX,
        )
    }
}

/// Accepts a key given either as 64 hex characters (surrounding whitespace
/// ignored) or as 32 raw bytes, e.g. the contents of a key file.
///
/// Contents made up only of hex digits are always decoded as hex.
pub fn public_key_from_file_contents(contents: &[u8]) -> Result<[u8; PUBLIC_KEY_LEN], ConfigError> {
    let hex_text = std::str::from_utf8(contents)
        .ok()
        .map(str::trim)
        .filter(|text| !text.is_empty() && text.bytes().all(|b| b.is_ascii_hexdigit()));
    if let Some(text) = hex_text {
        let bytes = decode_hex(text).map_err(ConfigError::PublicKeyHex)?;
        return public_key_from_bytes(&bytes);
    }
    if contents.len() == PUBLIC_KEY_LEN {
        return public_key_from_bytes(contents);
    }
    let text = String::from_utf8_lossy(contents);
    let bytes = decode_hex(text.trim()).map_err(ConfigError::PublicKeyHex)?;
    public_key_from_bytes(&bytes)
}

fn public_key_from_bytes(bytes: &[u8]) -> Result<[u8; PUBLIC_KEY_LEN], ConfigError> {
    bytes
        .try_into()
        .map_err(|_| ConfigError::PublicKeyLength(bytes.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config() {
        let config = BenchConfig::sample().unwrap();
        assert_eq!(config.public_key, samples::public_key());
        assert_eq!(config.wrapper, samples::wrapper());
        assert_eq!(config.expected_token, samples::DET_HEX);
        assert_eq!(config.dataset, DatasetSpec::default());
        assert_eq!(config.workers, None);
    }

    #[test]
    fn test_bad_inputs() {
        assert!(matches!(
            BenchConfig::from_hex("abc", samples::DET_HEX, samples::WRAPPER_HEX),
            Err(ConfigError::PublicKeyHex(MalformedHexError::OddLength { len: 3 }))
        ));
        assert_eq!(
            BenchConfig::from_hex("abcd", samples::DET_HEX, samples::WRAPPER_HEX),
            Err(ConfigError::PublicKeyLength(2))
        );
        assert_eq!(
            BenchConfig::from_hex(samples::PUBLIC_KEY_HEX, "2001", samples::WRAPPER_HEX),
            Err(ConfigError::ExpectedToken(TokenError::Length(2)))
        );
        assert!(matches!(
            BenchConfig::from_hex(samples::PUBLIC_KEY_HEX, samples::DET_HEX, "xy"),
            Err(ConfigError::WrapperHex(MalformedHexError::InvalidDigit { index: 0, .. }))
        ));
    }

    #[test]
    fn test_key_file_contents() {
        let key = samples::public_key();
        assert_eq!(public_key_from_file_contents(&key), Ok(key));
        let text = format!("  {}\n", samples::PUBLIC_KEY_HEX.to_uppercase());
        assert_eq!(public_key_from_file_contents(text.as_bytes()), Ok(key));
        assert_eq!(
            public_key_from_file_contents(b"00"),
            Err(ConfigError::PublicKeyLength(1))
        );
    }

    #[test]
    fn test_short_hex_key_file_not_read_as_raw() {
        assert_eq!(
            public_key_from_file_contents(b"00112233445566778899aabbccddeeff"),
            Err(ConfigError::PublicKeyLength(16))
        );
        let mut raw = [0xeeu8; PUBLIC_KEY_LEN];
        raw[0] = 0x01;
        raw[31] = b'z';
        assert_eq!(public_key_from_file_contents(&raw), Ok(raw));
    }
}
