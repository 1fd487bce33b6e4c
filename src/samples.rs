//! Known-good sample wrapper and the key material it verifies against.

/// Expected identity token of [`WRAPPER_HEX`].
pub const DET_HEX: &str = "2001003FFE040105e4c6ae84e5970447";

pub const PUBLIC_KEY_HEX: &str =
    "8929f7b90f585512a3a4c884eb6dce08c0280a3f0654ad4f4ccac646c00400ad";

/// 129-byte wrapper: 49 header bytes, the DET, and an Ed25519 signature.
pub const WRAPPER_HEX: &str = concat!(
    "4525f2675533f267445249502f312e30001666fed3ab0263f191c36bb24508ef",
    "913c551130488edd1d2e774b3d52524ca3",
    "2001003ffe040105e4c6ae84e5970447",
    "6cc7a5455eb663aeb367c102c2136e300e74a47ab3cc500539d6a5b3cb13761f",
    "092403326a98046ee8a79aa33f5d4f87219e7437902334b89230345057f53007",
);

#[cfg(test)]
pub(crate) fn wrapper() -> Vec<u8> {
    crate::util::decode_hex(WRAPPER_HEX).expect("sample wrapper is valid hex")
}

#[cfg(test)]
pub(crate) fn public_key() -> [u8; 32] {
    crate::util::decode_hex(PUBLIC_KEY_HEX)
        .expect("sample key is valid hex")
        .try_into()
        .expect("sample key is 32 bytes")
}
