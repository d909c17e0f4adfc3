use near_sdk::{env, CryptoHash};

/// Digest applied to the raw preimage bytes. Fixed at build time.
pub const HASH_ALGORITHM: &str = "sha256";

const EMPTY_DIGEST: CryptoHash = [0u8; 32];

pub fn hash_preimage(preimage: &[u8]) -> CryptoHash {
    env::sha256_array(preimage)
}

/// Checks `sha256(preimage) == hashlock`.
///
/// A plain array comparison: the executor is deterministic and public, and a
/// successful claim reveals the preimage anyway, so timing side channels are
/// not part of the threat model.
pub fn preimage_matches(hashlock: &CryptoHash, preimage: &[u8]) -> bool {
    hash_preimage(preimage) == *hashlock
}

pub fn is_empty_hashlock(hashlock: &CryptoHash) -> bool {
    *hashlock == EMPTY_DIGEST
}
