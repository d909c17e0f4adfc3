use near_sdk::json_types::{Base58CryptoHash, Base64VecU8, U64};
use near_sdk::serde::Serialize;
use near_sdk::{env, serde_json, AccountId, NearToken};

use crate::swap::SwapStatus;

pub const EVENT_STANDARD: &str = "htlc";
pub const EVENT_VERSION: &str = "1.0.0";

/// Structured events in the NEP-297 layout. Watchers on a paired escrow read
/// `swap_claimed` to learn the revealed preimage.
#[derive(Serialize, Debug)]
#[serde(crate = "near_sdk::serde")]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum HtlcEvent<'a> {
    SwapInitiated {
        id: Base58CryptoHash,
        sender: &'a AccountId,
        recipient: &'a AccountId,
        amount: NearToken,
        storage_fee: NearToken,
        hashlock: Base58CryptoHash,
        deadline: U64,
    },
    SwapClaimed {
        id: Base58CryptoHash,
        sender: &'a AccountId,
        recipient: &'a AccountId,
        amount: NearToken,
        preimage: Base64VecU8,
        caller: &'a AccountId,
    },
    SwapRefunded {
        id: Base58CryptoHash,
        sender: &'a AccountId,
        recipient: &'a AccountId,
        amount: NearToken,
    },
    SwapSettlementFailed {
        id: Base58CryptoHash,
        reverted: SwapStatus,
        amount: NearToken,
    },
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct EventLog<'a> {
    standard: &'static str,
    version: &'static str,
    #[serde(flatten)]
    event: &'a HtlcEvent<'a>,
}

impl HtlcEvent<'_> {
    pub fn to_json_string(&self) -> String {
        let log = EventLog {
            standard: EVENT_STANDARD,
            version: EVENT_VERSION,
            event: self,
        };
        serde_json::to_string(&log).unwrap_or_else(|_| env::panic_str("Failed to serialize event"))
    }

    pub fn emit(&self) {
        env::log_str(&format!("EVENT_JSON:{}", self.to_json_string()));
    }
}
