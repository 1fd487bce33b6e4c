//! Benchmark datasets: copies of one canonical wrapper, some deliberately broken.

use thiserror::Error;

use crate::util::bit_twiddling::{bit_len, flip_bit_i, flip_byte};

/// How a corrupted copy differs from the canonical wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    /// XOR the byte at `offset` with `mask`.
    FlipByte { offset: usize, mask: u8 },
    /// Flip a single bit (bit 0 is the high bit of byte 0).
    FlipBit { bit: usize },
    /// Keep only the first `len` bytes.
    Truncate { len: usize },
}

impl Default for Corruption {
    fn default() -> Self {
        Corruption::FlipByte {
            offset: 10,
            mask: 0xff,
        }
    }
}

impl Corruption {
    pub fn apply(&self, wrapper: &[u8]) -> Result<Vec<u8>, DatasetError> {
        let mut corrupted = wrapper.to_vec();
        let in_range = match *self {
            Corruption::FlipByte { mask: 0, .. } => return Err(DatasetError::NoOpCorruption),
            Corruption::FlipByte { offset, mask } => flip_byte(&mut corrupted, offset, mask),
            Corruption::FlipBit { bit } => flip_bit_i(&mut corrupted, bit),
            Corruption::Truncate { len } if len >= wrapper.len() => {
                return Err(DatasetError::NoOpCorruption)
            }
            Corruption::Truncate { len } => {
                corrupted.truncate(len);
                true
            }
        };
        if !in_range {
            return Err(DatasetError::OutOfRange {
                corruption: *self,
                len: wrapper.len(),
                bits: bit_len(wrapper),
            });
        }
        Ok(corrupted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("{corruption:?} is outside a {len}-byte ({bits}-bit) wrapper")]
    OutOfRange {
        corruption: Corruption,
        len: usize,
        bits: usize,
    },
    #[error("corruption would leave the wrapper unchanged")]
    NoOpCorruption,
    #[error("{valid} valid + {corrupted} corrupted items overflows the dataset size")]
    TooLarge { valid: usize, corrupted: usize },
}

/// Shape of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSpec {
    pub valid: usize,
    pub corrupted: usize,
    pub corruption: Corruption,
}

impl Default for DatasetSpec {
    fn default() -> Self {
        Self {
            valid: 1000,
            corrupted: 500,
            corruption: Corruption::default(),
        }
    }
}

/// `valid` identical copies of the canonical wrapper followed by `corrupted` broken ones.
#[derive(Debug, Clone)]
pub struct Dataset {
    envelopes: Vec<Vec<u8>>,
    valid: usize,
}

impl Dataset {
    pub fn build(canonical: &[u8], spec: &DatasetSpec) -> Result<Self, DatasetError> {
        let len = spec
            .valid
            .checked_add(spec.corrupted)
            .ok_or(DatasetError::TooLarge {
                valid: spec.valid,
                corrupted: spec.corrupted,
            })?;
        let corrupted = spec.corruption.apply(canonical)?;
        let mut envelopes = Vec::with_capacity(len);
        envelopes.extend(std::iter::repeat(canonical).take(spec.valid).map(<[u8]>::to_vec));
        envelopes.extend(std::iter::repeat(corrupted).take(spec.corrupted));
        Ok(Self {
            envelopes,
            valid: spec.valid,
        })
    }

    pub fn all(&self) -> &[Vec<u8>] {
        &self.envelopes
    }

    pub fn valid(&self) -> &[Vec<u8>] {
        &self.envelopes[..self.valid]
    }

    pub fn corrupted(&self) -> &[Vec<u8>] {
        &self.envelopes[self.valid..]
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }
}
