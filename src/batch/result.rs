use std::time::Duration;

/// Outcome of verifying one wrapper. Timing covers the signature check only.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub is_signature_valid: bool,
    /// Lowercase hex of the embedded identity token; empty if the wrapper didn't parse.
    pub identity_token_hex: String,
    pub elapsed: Duration,
}

impl VerificationResult {
    pub(crate) fn rejected() -> Self {
        Self {
            is_signature_valid: false,
            identity_token_hex: String::new(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1e3
    }

    /// Equal validity and token, ignoring timing.
    pub fn same_outcome(&self, other: &Self) -> bool {
        self.is_signature_valid == other.is_signature_valid
            && self.identity_token_hex == other.identity_token_hex
    }
}
