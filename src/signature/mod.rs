mod ed25519;
#[cfg(test)]
mod signer;
mod subsystem;
mod verifier;

pub use subsystem::{Crypto, InvalidPublicKeyError, SubsystemInitError};
pub use verifier::DetachedVerifier;

pub const SIGNATURE_LEN: usize = 64;
pub const PUBLIC_KEY_LEN: usize = 32;
