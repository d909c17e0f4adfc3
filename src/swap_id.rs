use near_sdk::{borsh::BorshSerialize, env, near, AccountId, CryptoHash};

use crate::timelocks::Deadline;

/// Unique identifier for a swap: SHA-256 of the borsh-encoded [`SwapIdSeed`].
pub type SwapId = CryptoHash;

/// Everything that goes into a swap id. The `nonce` is the registry's
/// sequence number, so two structurally identical initiations still get
/// distinct ids.
#[near(serializers = [borsh])]
pub struct SwapIdSeed {
    pub sender: AccountId,
    pub recipient: AccountId,
    pub hashlock: CryptoHash,
    pub deadline: Deadline,
    pub nonce: u64,
}

impl SwapIdSeed {
    /// Serializes the seed into a canonical byte array.
    pub fn to_message_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        self.serialize(&mut buffer).expect("Serialization failed");
        buffer
    }

    pub fn derive(&self) -> SwapId {
        env::sha256_array(&self.to_message_bytes())
    }
}
