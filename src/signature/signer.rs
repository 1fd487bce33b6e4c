use ed25519_dalek as ed25519;

use crate::token::IdentityToken;

/// Builds wrappers for tests: `header || token || sign(header || token)`.
pub trait Sealer {
    fn seal(&self, header: &[u8], token: &IdentityToken) -> Vec<u8>;
}

impl Sealer for ed25519::Keypair {
    fn seal(&self, header: &[u8], token: &IdentityToken) -> Vec<u8> {
        use ::signature::Signer as _;
        let mut wrapper = header.to_vec();
        wrapper.extend_from_slice(token.as_bytes());
        let signature = self.sign(&wrapper);
        wrapper.extend_from_slice(&signature.to_bytes());
        wrapper
    }
}
