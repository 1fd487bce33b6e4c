mod batch;
mod config;
mod dataset;
mod envelope;
mod harness;
pub mod samples;
mod signature;
mod token;
mod util;

pub use batch::{
    speedup, throughput, verify_one, BatchRun, BatchVerifier, Tally, VerificationResult,
};
pub use config::{public_key_from_file_contents, BenchConfig, ConfigError};
pub use dataset::{Corruption, Dataset, DatasetError, DatasetSpec};
pub use envelope::{
    parse as parse_envelope, EnvelopeTooShortError, ParsedEnvelope, MIN_ENVELOPE_LEN,
};
pub use harness::{
    run as run_benchmark, self_test, BenchmarkReport, Comparison, Error as BenchmarkError,
    PhaseSummary, SelfTestError,
};
pub use signature::{
    Crypto, DetachedVerifier, InvalidPublicKeyError, SubsystemInitError, PUBLIC_KEY_LEN,
    SIGNATURE_LEN,
};
pub use token::{token_matches, IdentityToken, TokenError, TOKEN_LEN};
pub use util::{decode_hex, encode_hex, eq_ignore_case, MalformedHexError};

#[cfg(test)]
mod tests;
