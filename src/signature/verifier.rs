use std::time::{Duration, Instant};

use super::SIGNATURE_LEN;

/// Checks detached signatures against a single, fixed public key.
///
/// Implementations must be callable from many threads at once.
pub trait DetachedVerifier {
    /// `true` iff `signature` was made over exactly `msg` by this key's owner.
    fn verify_detached(&self, msg: &[u8], signature: &[u8; SIGNATURE_LEN]) -> bool;

    /// Like [`verify_detached`](Self::verify_detached), also reporting how long
    /// the check took.
    fn verify_timed(&self, msg: &[u8], signature: &[u8; SIGNATURE_LEN]) -> (bool, Duration) {
        let start = Instant::now();
        let valid = self.verify_detached(msg, signature);
        (valid, start.elapsed())
    }
}
