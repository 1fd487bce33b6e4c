use std::time::Duration;

use super::VerificationResult;
use crate::token::token_matches;

/// Valid/invalid counts for a batch, judged against an expected identity token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub valid: usize,
    pub invalid: usize,
}

impl Tally {
    /// A result is valid when its signature checks out *and* its token matches
    /// `expected_hex` (case-insensitively).
    pub fn of(results: &[VerificationResult], expected_hex: &str) -> Self {
        let valid = results
            .iter()
            .filter(|r| r.is_signature_valid && token_matches(&r.identity_token_hex, expected_hex))
            .count();
        Self {
            valid,
            invalid: results.len() - valid,
        }
    }

    pub fn total(&self) -> usize {
        self.valid + self.invalid
    }
}

/// Items per second, or `None` if no time elapsed.
pub fn throughput(items: usize, wall: Duration) -> Option<f64> {
    let secs = wall.as_secs_f64();
    (secs > 0.0).then(|| items as f64 / secs)
}

/// `sequential / parallel`, or `None` if the parallel run took no time.
pub fn speedup(sequential: Duration, parallel: Duration) -> Option<f64> {
    let parallel = parallel.as_secs_f64();
    (parallel > 0.0).then(|| sequential.as_secs_f64() / parallel)
}
