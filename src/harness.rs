//! Drives the batch engine: self-test gate, then sequential and parallel
//! phases over the full dataset and over its corrupted suffix alone.

use std::fmt;
use std::time::Duration;

use rayon::ThreadPoolBuildError;
use thiserror::Error;

use crate::batch::{speedup, throughput, BatchRun, BatchVerifier, Tally, VerificationResult};
use crate::config::BenchConfig;
use crate::dataset::{Dataset, DatasetError};
use crate::signature::{Crypto, DetachedVerifier, InvalidPublicKeyError};
use crate::token::token_matches;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelfTestError {
    #[error("canonical wrapper failed signature verification")]
    InvalidSignature(VerificationResult),
    #[error("canonical wrapper carries token {actual:?}, expected {expected:?}")]
    TokenMismatch { expected: String, actual: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    PublicKey(#[from] InvalidPublicKeyError),
    #[error("self-test failed: {0}")]
    SelfTest(#[from] SelfTestError),
    #[error("building dataset: {0}")]
    Dataset(#[from] DatasetError),
    #[error("starting worker pool: {0}")]
    Pool(#[from] ThreadPoolBuildError),
}

/// Verifies the canonical wrapper once; nothing is benchmarked unless this passes.
pub fn self_test<V: DetachedVerifier + Sync>(
    engine: &BatchVerifier<V>,
    wrapper: &[u8],
    expected_token_hex: &str,
) -> Result<VerificationResult, SelfTestError> {
    let result = engine.verify_one(wrapper);
    if !result.is_signature_valid {
        return Err(SelfTestError::InvalidSignature(result));
    }
    if !token_matches(&result.identity_token_hex, expected_token_hex) {
        return Err(SelfTestError::TokenMismatch {
            expected: expected_token_hex.to_string(),
            actual: result.identity_token_hex,
        });
    }
    tracing::info!(
        token = %result.identity_token_hex,
        elapsed_ms = result.elapsed_millis(),
        "self-test passed"
    );
    Ok(result)
}

/// One timed batch, reduced to counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSummary {
    pub tally: Tally,
    pub wall: Duration,
}

impl PhaseSummary {
    pub fn of(run: &BatchRun, expected_token_hex: &str) -> Self {
        Self {
            tally: run.tally(expected_token_hex),
            wall: run.wall,
        }
    }

    pub fn items(&self) -> usize {
        self.tally.total()
    }

    pub fn throughput(&self) -> Option<f64> {
        throughput(self.items(), self.wall)
    }
}

/// The same dataset run both ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub sequential: PhaseSummary,
    pub parallel: PhaseSummary,
}

impl Comparison {
    pub fn speedup(&self) -> Option<f64> {
        speedup(self.sequential.wall, self.parallel.wall)
    }
}

#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub self_test: VerificationResult,
    pub expected_token: String,
    pub workers: usize,
    pub full: Comparison,
    pub corrupted_only: Comparison,
}

fn compare<V: DetachedVerifier + Sync>(
    label: &str,
    engine: &BatchVerifier<V>,
    dataset: &[Vec<u8>],
    expected_token_hex: &str,
) -> Comparison {
    let sequential = engine.verify_all_sequential(dataset);
    let sequential = PhaseSummary::of(&sequential, expected_token_hex);
    let parallel = engine.verify_all_parallel(dataset);
    let parallel = PhaseSummary::of(&parallel, expected_token_hex);
    for (mode, phase) in [("sequential", &sequential), ("parallel", &parallel)] {
        tracing::info!(
            phase = label,
            mode,
            valid = phase.tally.valid,
            invalid = phase.tally.invalid,
            wall = ?phase.wall,
            "phase complete"
        );
    }
    Comparison {
        sequential,
        parallel,
    }
}

/// Runs the full benchmark described by `config`.
pub fn run(crypto: &Crypto, config: &BenchConfig) -> Result<BenchmarkReport, Error> {
    let key = crypto.public_key(&config.public_key)?;
    let engine = BatchVerifier::new(crypto, key, config.workers)?;
    let self_test = self_test(&engine, &config.wrapper, &config.expected_token)?;

    let dataset = Dataset::build(&config.wrapper, &config.dataset)?;
    tracing::info!(
        valid = config.dataset.valid,
        corrupted = config.dataset.corrupted,
        workers = engine.workers(),
        "dataset ready"
    );
    let full = compare("full", &engine, dataset.all(), &config.expected_token);
    let corrupted_only = compare(
        "corrupted-only",
        &engine,
        dataset.corrupted(),
        &config.expected_token,
    );

    Ok(BenchmarkReport {
        self_test,
        expected_token: config.expected_token.clone(),
        workers: engine.workers(),
        full,
        corrupted_only,
    })
}

struct Rate(Option<f64>);

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(rate) => write!(f, "{rate:.0}"),
            None => f.write_str("n/a"),
        }
    }
}

struct Factor(Option<f64>);

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(factor) => write!(f, "{factor:.2}x"),
            None => f.write_str("n/a"),
        }
    }
}

impl fmt::Display for PhaseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Valid wrappers: {}/{}", self.tally.valid, self.items())?;
        writeln!(f, "Invalid wrappers: {}", self.tally.invalid)?;
        writeln!(f, "Total time: {:.3} ms", self.wall.as_secs_f64() * 1e3)?;
        writeln!(f, "Verifications/sec: {}", Rate(self.throughput()))
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Single Wrapper Verification ===")?;
        writeln!(f, "Valid: {}", self.self_test.is_signature_valid)?;
        writeln!(f, "DET: {}", self.self_test.identity_token_hex)?;
        writeln!(f, "Expected DET: {}", self.expected_token)?;
        writeln!(
            f,
            "Verification time: {:.3} ms",
            self.self_test.elapsed_millis()
        )?;

        writeln!(f, "\n=== Sequential Verification ===")?;
        write!(f, "{}", self.full.sequential)?;
        writeln!(f, "\n=== Parallel Verification ===")?;
        writeln!(f, "Using {} threads", self.workers)?;
        write!(f, "{}", self.full.parallel)?;
        writeln!(f, "Speedup: {}", Factor(self.full.speedup()))?;

        let corrupted = self.corrupted_only.sequential.items();
        writeln!(f, "\n=== Timing Invalid Wrappers Only (Sequential) ===")?;
        writeln!(
            f,
            "Time to verify {corrupted} invalid wrappers: {:.3} ms",
            self.corrupted_only.sequential.wall.as_secs_f64() * 1e3
        )?;
        writeln!(
            f,
            "Verifications/sec: {}",
            Rate(self.corrupted_only.sequential.throughput())
        )?;
        writeln!(f, "\n=== Timing Invalid Wrappers Only (Parallel) ===")?;
        writeln!(
            f,
            "Time to verify {corrupted} invalid wrappers: {:.3} ms",
            self.corrupted_only.parallel.wall.as_secs_f64() * 1e3
        )?;
        writeln!(
            f,
            "Verifications/sec: {}",
            Rate(self.corrupted_only.parallel.throughput())
        )?;
        writeln!(f, "Speedup: {}", Factor(self.corrupted_only.speedup()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Corruption, DatasetSpec};
    use crate::samples;
    use std::num::NonZeroUsize;

    fn small_config() -> BenchConfig {
        let mut config = BenchConfig::sample().unwrap();
        config.dataset = DatasetSpec {
            valid: 12,
            corrupted: 6,
            corruption: Corruption::default(),
        };
        config.workers = NonZeroUsize::new(3);
        config
    }

    #[test]
    fn test_run_sample() -> anyhow::Result<()> {
        let crypto = Crypto::init()?;
        let report = run(&crypto, &small_config())?;

        assert!(report.self_test.is_signature_valid);
        assert_eq!(report.workers, 3);
        for phase in [report.full.sequential, report.full.parallel] {
            assert_eq!(phase.tally, Tally { valid: 12, invalid: 6 });
        }
        for phase in [report.corrupted_only.sequential, report.corrupted_only.parallel] {
            assert_eq!(phase.tally, Tally { valid: 0, invalid: 6 });
        }

        let text = report.to_string();
        assert!(text.contains("Valid wrappers: 12/18"));
        assert!(text.contains("Using 3 threads"));
        assert!(text.contains("Time to verify 6 invalid wrappers"));
        Ok(())
    }

    #[test]
    fn test_truncating_corruption() -> anyhow::Result<()> {
        let crypto = Crypto::init()?;
        let mut config = small_config();
        config.dataset.corruption = Corruption::Truncate { len: 40 };
        let report = run(&crypto, &config)?;
        assert_eq!(report.full.parallel.tally, Tally { valid: 12, invalid: 6 });
        Ok(())
    }

    #[test]
    fn test_self_test_rejects_corrupted_wrapper() {
        let crypto = Crypto::init().unwrap();
        let mut config = small_config();
        config.wrapper[10] ^= 0xff;
        assert!(matches!(
            run(&crypto, &config),
            Err(Error::SelfTest(SelfTestError::InvalidSignature(_)))
        ));
    }

    #[test]
    fn test_self_test_rejects_wrong_token() {
        let crypto = Crypto::init().unwrap();
        let mut config = small_config();
        config.expected_token = "00000000000000000000000000000000".to_string();
        assert!(matches!(
            run(&crypto, &config),
            Err(Error::SelfTest(SelfTestError::TokenMismatch { .. }))
        ));
    }

    #[test]
    fn test_self_test_accepts_any_case() {
        let crypto = Crypto::init().unwrap();
        let key = crypto.public_key(&samples::public_key()).unwrap();
        let engine = BatchVerifier::new(&crypto, key, NonZeroUsize::new(1)).unwrap();
        let result = self_test(
            &engine,
            &samples::wrapper(),
            &samples::DET_HEX.to_lowercase(),
        )
        .unwrap();
        assert_eq!(result.identity_token_hex, samples::DET_HEX.to_lowercase());
    }

    #[test]
    fn test_out_of_range_corruption() {
        let crypto = Crypto::init().unwrap();
        let mut config = small_config();
        config.dataset.corruption = Corruption::FlipByte {
            offset: 1000,
            mask: 1,
        };
        assert!(matches!(
            run(&crypto, &config),
            Err(Error::Dataset(DatasetError::OutOfRange { .. }))
        ));
    }
}
