pub(crate) mod bit_twiddling;
mod hex_codec;

pub use hex_codec::{decode as decode_hex, encode as encode_hex, eq_ignore_case, MalformedHexError};
