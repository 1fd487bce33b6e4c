//! Verifying many wrappers, sequentially or on a worker pool.

mod result;
mod tally;

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::envelope;
use crate::signature::{Crypto, DetachedVerifier};

pub use result::VerificationResult;
pub use tally::{speedup, throughput, Tally};

/// Verifies a single raw wrapper.
///
/// Never fails: a wrapper too short to parse comes back as an invalid result.
pub fn verify_one<V: DetachedVerifier + ?Sized>(raw: &[u8], verifier: &V) -> VerificationResult {
    let parsed = match envelope::parse(raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::trace!(%err, "rejecting unparseable wrapper");
            return VerificationResult::rejected();
        }
    };
    let identity_token_hex = parsed.identity_token().to_hex();
    let (is_signature_valid, elapsed) =
        verifier.verify_timed(parsed.signed_payload(), parsed.signature());
    VerificationResult {
        is_signature_valid,
        identity_token_hex,
        elapsed,
    }
}

/// Results of one batch, in dataset order, and the wall time around the whole batch.
#[derive(Debug, Clone)]
pub struct BatchRun {
    pub results: Vec<VerificationResult>,
    pub wall: Duration,
}

impl BatchRun {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn tally(&self, expected_token_hex: &str) -> Tally {
        Tally::of(&self.results, expected_token_hex)
    }
}

/// Batch engine: one read-only verifier shared by a fixed-size worker pool.
pub struct BatchVerifier<V> {
    verifier: V,
    pool: ThreadPool,
}

impl<V: DetachedVerifier + Sync> BatchVerifier<V> {
    /// `workers` defaults to the available hardware parallelism.
    ///
    /// Takes a [`Crypto`] handle so no engine exists before the primitive is initialized.
    pub fn new(
        _crypto: &Crypto,
        verifier: V,
        workers: Option<NonZeroUsize>,
    ) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.map_or(0, NonZeroUsize::get))
            .thread_name(|i| format!("det-verify-{i}"))
            .build()?;
        Ok(Self { verifier, pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn verify_one(&self, raw: &[u8]) -> VerificationResult {
        verify_one(raw, &self.verifier)
    }

    pub fn verify_all_sequential<E: AsRef<[u8]>>(&self, dataset: &[E]) -> BatchRun {
        tracing::debug!(items = dataset.len(), "sequential batch started");
        let start = Instant::now();
        let results: Vec<VerificationResult> = dataset
            .iter()
            .map(|raw| self.verify_one(raw.as_ref()))
            .collect();
        let wall = start.elapsed();
        tracing::debug!(items = dataset.len(), ?wall, "sequential batch finished");
        BatchRun { results, wall }
    }

    /// Returns once every item has been verified; `results[i]` belongs to `dataset[i]`.
    pub fn verify_all_parallel<E: AsRef<[u8]> + Sync>(&self, dataset: &[E]) -> BatchRun {
        tracing::debug!(
            items = dataset.len(),
            workers = self.workers(),
            "parallel batch started"
        );
        let start = Instant::now();
        let results: Vec<VerificationResult> = self.pool.install(|| {
            dataset
                .par_iter()
                .map(|raw| self.verify_one(raw.as_ref()))
                .collect()
        });
        let wall = start.elapsed();
        tracing::debug!(items = dataset.len(), ?wall, "parallel batch finished");
        BatchRun { results, wall }
    }
}
