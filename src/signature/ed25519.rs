use super::DetachedVerifier;
use super::SIGNATURE_LEN;
use ed25519_dalek as ed25519;

impl DetachedVerifier for ed25519::PublicKey {
    fn verify_detached(&self, msg: &[u8], signature: &[u8; SIGNATURE_LEN]) -> bool {
        use ::signature::Verifier as _;
        // Signatures whose scalar is out of range don't parse; they can't verify either.
        match ed25519::Signature::try_from(&signature[..]) {
            Ok(signature) => self.verify(msg, &signature).is_ok(),
            Err(_) => false,
        }
    }
}
