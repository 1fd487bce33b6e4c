use std::sync::OnceLock;

use ed25519_dalek as ed25519;
use thiserror::Error;

use super::{DetachedVerifier, PUBLIC_KEY_LEN};

const PROBE_SEED: [u8; 32] = [0x5a; 32];
const PROBE_MESSAGE: &[u8] = b"det-verify subsystem probe";

static SELF_CHECK: OnceLock<Result<(), SubsystemInitError>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubsystemInitError {
    #[error("could not derive the probe key")]
    ProbeKey,
    #[error("verifier rejected a genuine probe signature")]
    RejectedGenuine,
    #[error("verifier accepted a tampered probe signature")]
    AcceptedTampered,
}

#[derive(Debug, Error)]
#[error("invalid ed25519 public key: {0}")]
pub struct InvalidPublicKeyError(#[from] ed25519::SignatureError);

/// Proof that the signature primitive has been initialized.
///
/// The underlying self-check runs once per process; every later [`Crypto::init`]
/// returns its cached outcome. Verifiers are only handed out through this type.
#[derive(Debug)]
pub struct Crypto {
    _initialized: (),
}

impl Crypto {
    pub fn init() -> Result<Self, SubsystemInitError> {
        (*SELF_CHECK.get_or_init(self_check))?;
        Ok(Self { _initialized: () })
    }

    pub fn public_key(
        &self,
        bytes: &[u8; PUBLIC_KEY_LEN],
    ) -> Result<ed25519::PublicKey, InvalidPublicKeyError> {
        Ok(ed25519::PublicKey::from_bytes(bytes)?)
    }
}

fn self_check() -> Result<(), SubsystemInitError> {
    let result = probe();
    match &result {
        Ok(()) => tracing::info!("ed25519 subsystem initialized"),
        Err(err) => tracing::error!(%err, "ed25519 subsystem self-check failed"),
    }
    result
}

fn probe() -> Result<(), SubsystemInitError> {
    use ::signature::Signer as _;

    let secret =
        ed25519::SecretKey::from_bytes(&PROBE_SEED).map_err(|_| SubsystemInitError::ProbeKey)?;
    let public: ed25519::PublicKey = (&secret).into();
    let keypair = ed25519::Keypair { secret, public };

    let mut signature = keypair.sign(PROBE_MESSAGE).to_bytes();
    if !public.verify_detached(PROBE_MESSAGE, &signature) {
        return Err(SubsystemInitError::RejectedGenuine);
    }
    signature[0] ^= 0x01;
    if public.verify_detached(PROBE_MESSAGE, &signature) {
        return Err(SubsystemInitError::AcceptedTampered);
    }
    Ok(())
}
