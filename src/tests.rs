use std::num::NonZeroUsize;

use ed25519_dalek as ed25519;
use proptest::collection::vec as prop_vec;
use proptest::prelude::*;
use proptest::sample::Index;

use crate::batch::{BatchVerifier, Tally};
use crate::dataset::{Corruption, Dataset, DatasetSpec};
use crate::envelope::{parse, MIN_ENVELOPE_LEN};
use crate::signature::tests::{key_pairs, Sealer};
use crate::signature::{Crypto, SIGNATURE_LEN};
use crate::token::IdentityToken;
use crate::util::bit_twiddling::flip_bit_i;

fn engine(key: &ed25519::Keypair) -> anyhow::Result<BatchVerifier<ed25519::PublicKey>> {
    let crypto = Crypto::init()?;
    Ok(BatchVerifier::new(&crypto, key.public, NonZeroUsize::new(2))?)
}

fn run_dataset_test(
    key: &ed25519::Keypair,
    header: &[u8],
    token: &IdentityToken,
    spec: DatasetSpec,
) -> anyhow::Result<()> {
    let engine = engine(key)?;
    let wrapper = key.seal(header, token);

    // 1. Self-test the canonical wrapper.
    let result = engine.verify_one(&wrapper);
    anyhow::ensure!(result.is_signature_valid, "canonical wrapper rejected");
    anyhow::ensure!(result.identity_token_hex == token.to_hex());

    // 2. Build the dataset and verify it both ways.
    let dataset = Dataset::build(&wrapper, &spec)?;
    let expected = Tally {
        valid: spec.valid,
        invalid: spec.corrupted,
    };
    let sequential = engine.verify_all_sequential(dataset.all());
    let parallel = engine.verify_all_parallel(dataset.all());
    anyhow::ensure!(sequential.tally(&token.to_hex()) == expected);
    anyhow::ensure!(parallel.tally(&token.to_hex()) == expected);

    // 3. The corrupted suffix alone is all invalid.
    let corrupted = engine.verify_all_parallel(dataset.corrupted());
    anyhow::ensure!(corrupted.tally(&token.to_hex()).valid == 0);
    Ok(())
}

fn corruptions(wrapper_len: usize) -> impl Strategy<Value = Corruption> {
    prop_oneof![
        (0..wrapper_len, 1u8..=255).prop_map(|(offset, mask)| Corruption::FlipByte { offset, mask }),
        (0..wrapper_len * 8).prop_map(|bit| Corruption::FlipBit { bit }),
        (0..wrapper_len).prop_map(|len| Corruption::Truncate { len }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_dataset_end_to_end(
        key in key_pairs(),
        token: IdentityToken,
        (header, corruption) in (9usize..48).prop_flat_map(|header_len| {
            (prop_vec(any::<u8>(), header_len), corruptions(header_len + 80))
        }),
        valid in 0usize..24,
        corrupted in 0usize..24,
    ) {
        let spec = DatasetSpec { valid, corrupted, corruption };
        run_dataset_test(&key, &header, &token, spec).unwrap();
    }

    /// Any single-bit change to the signed payload breaks the signature.
    #[test]
    fn test_payload_tamper(
        key in key_pairs(),
        token: IdentityToken,
        header in prop_vec(any::<u8>(), 9..48),
        index: Index,
    ) {
        let engine = engine(&key).unwrap();
        let mut wrapper = key.seal(&header, &token);
        let payload_bits = (wrapper.len() - SIGNATURE_LEN) * 8;
        flip_bit_i(&mut wrapper, index.index(payload_bits));
        prop_assert!(!engine.verify_one(&wrapper).is_signature_valid);
    }

    /// Any single-bit change to the trailing signature breaks it too.
    #[test]
    fn test_signature_tamper(
        key in key_pairs(),
        token: IdentityToken,
        header in prop_vec(any::<u8>(), 9..48),
        index: Index,
    ) {
        let engine = engine(&key).unwrap();
        let mut wrapper = key.seal(&header, &token);
        let signature_start = (wrapper.len() - SIGNATURE_LEN) * 8;
        flip_bit_i(&mut wrapper, signature_start + index.index(SIGNATURE_LEN * 8));
        let result = engine.verify_one(&wrapper);
        prop_assert!(!result.is_signature_valid);
        prop_assert_eq!(result.identity_token_hex, token.to_hex());
    }

    #[test]
    fn test_minimum_length_wrapper(key in key_pairs(), token: IdentityToken, header: [u8; 9]) {
        let engine = engine(&key).unwrap();
        let wrapper = key.seal(&header, &token);
        prop_assert_eq!(wrapper.len(), MIN_ENVELOPE_LEN);
        let parsed = parse(&wrapper).unwrap();
        prop_assert_eq!(parsed.header(), &header[..]);
        prop_assert!(engine.verify_one(&wrapper).is_signature_valid);
        prop_assert!(!engine.verify_one(&wrapper[1..]).is_signature_valid);
    }
}
