use near_sdk::json_types::{Base58CryptoHash, Base64VecU8, U64};
use near_sdk::store::IterableMap;
use near_sdk::{
    bs58, env, ext_contract, log, near, AccountId, CryptoHash, Gas, NearToken, Promise,
    PromiseResult, Timestamp,
};

mod errors;
mod events;
mod hashlock;
mod swap;
mod swap_id;
mod timelocks;

pub use errors::HtlcError;
pub use swap::{Swap, SwapStatus, SwapView};
pub use swap_id::SwapId;

use events::{HtlcEvent, EVENT_STANDARD, EVENT_VERSION};
use hashlock::{is_empty_hashlock, HASH_ALGORITHM};
use swap::Release;
use swap_id::SwapIdSeed;
use timelocks::Deadline;

const GAS_FOR_SETTLEMENT: Gas = Gas::from_tgas(10);
const DEFAULT_PAGE_SIZE: u64 = 50;

#[ext_contract(ext_self)]
pub trait SelfCallbacks {
    fn on_swap_settled(&mut self, id: Base58CryptoHash);
}

/// Static facts about this deployment.
#[near(serializers = [json])]
pub struct ContractInfo {
    pub hash_algorithm: String,
    pub event_standard: String,
    pub event_version: String,
    pub next_nonce: U64,
}

// Define the contract structure
#[near(contract_state)]
pub struct Contract {
    // Every swap ever initiated, keyed by its derived id. Terminal records are kept.
    pub swaps: IterableMap<SwapId, Swap>,
    // Sequence number mixed into the next swap id
    pub next_nonce: u64,
}

impl Default for Contract {
    fn default() -> Self {
        Self {
            swaps: IterableMap::new(b"s"),
            next_nonce: 0,
        }
    }
}

#[near]
impl Contract {
    #[init]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the attached deposit, minus the storage fee for the new record,
    /// for `recipient` under `hashlock` until `deadline` (nanoseconds since the
    /// Unix epoch). The predecessor becomes the sender and is the only account
    /// a refund can go to.
    #[payable]
    #[handle_result]
    pub fn initiate(
        &mut self,
        recipient: AccountId,
        hashlock: Base58CryptoHash,
        deadline: U64,
    ) -> Result<Base58CryptoHash, HtlcError> {
        let id = self.internal_initiate(
            env::predecessor_account_id(),
            recipient,
            env::attached_deposit(),
            hashlock.into(),
            Deadline::new(deadline.0),
            env::block_timestamp(),
        )?;
        Ok(id.into())
    }

    /// Releases the escrow to the recipient. Any account may relay the
    /// preimage; the funds always go to the recipient.
    #[handle_result]
    pub fn claim(
        &mut self,
        id: Base58CryptoHash,
        preimage: Base64VecU8,
    ) -> Result<Promise, HtlcError> {
        let id: SwapId = id.into();
        let caller = env::predecessor_account_id();
        let release = self.internal_claim(id, &preimage, &caller, env::block_timestamp())?;
        Ok(Self::transfer_with_settlement(id, release))
    }

    /// Returns the escrow to the sender once the deadline has been reached.
    /// Callable by anyone; the funds always go to the sender.
    #[handle_result]
    pub fn refund(&mut self, id: Base58CryptoHash) -> Result<Promise, HtlcError> {
        let id: SwapId = id.into();
        let release = self.internal_refund(id, env::block_timestamp())?;
        Ok(Self::transfer_with_settlement(id, release))
    }

    // --- VIEWS ---

    pub fn get_swap(&self, id: Base58CryptoHash) -> Option<SwapView> {
        let id: SwapId = id.into();
        self.swaps.get(&id).map(|swap| swap.to_view(id))
    }

    pub fn get_swaps(&self, from_index: Option<U64>, limit: Option<U64>) -> Vec<SwapView> {
        let from = from_index.map_or(0, |i| i.0);
        let limit = limit.map_or(DEFAULT_PAGE_SIZE, |l| l.0);
        self.swaps
            .iter()
            .skip(usize::try_from(from).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|(id, swap)| swap.to_view(*id))
            .collect()
    }

    pub fn get_swaps_count(&self) -> U64 {
        U64(self.swaps.len() as u64)
    }

    pub fn contract_info(&self) -> ContractInfo {
        ContractInfo {
            hash_algorithm: HASH_ALGORITHM.to_string(),
            event_standard: EVENT_STANDARD.to_string(),
            event_version: EVENT_VERSION.to_string(),
            next_nonce: U64(self.next_nonce),
        }
    }

    // --- PRIVATE CALLBACKS ---
    #[private]
    pub fn on_swap_settled(&mut self, id: Base58CryptoHash) {
        let succeeded = matches!(env::promise_result(0), PromiseResult::Successful(_));
        self.resolve_settlement(id.into(), succeeded);
    }
}

impl Contract {
    /// The attached `deposit` pays for the new record's storage first; what
    /// remains is the escrowed amount and must be strictly positive.
    fn internal_initiate(
        &mut self,
        sender: AccountId,
        recipient: AccountId,
        deposit: NearToken,
        hashlock: CryptoHash,
        deadline: Deadline,
        now: Timestamp,
    ) -> Result<SwapId, HtlcError> {
        if deposit.is_zero() {
            return Err(HtlcError::InvalidAmount);
        }
        if is_empty_hashlock(&hashlock) {
            return Err(HtlcError::InvalidHashlock);
        }
        if !deadline.is_future(now) {
            return Err(HtlcError::InvalidDeadline);
        }

        let id = SwapIdSeed {
            sender: sender.clone(),
            recipient: recipient.clone(),
            hashlock,
            deadline,
            nonce: self.next_nonce,
        }
        .derive();
        if self.swaps.contains_key(&id) {
            return Err(HtlcError::IdCollision);
        }

        // Record size does not depend on the amount, so measure with the full deposit.
        let storage_before = env::storage_usage();
        self.swaps.insert(
            id,
            Swap::new(sender.clone(), recipient.clone(), deposit, hashlock, deadline),
        );
        self.swaps.flush();
        let storage_fee = env::storage_byte_cost()
            .saturating_mul(u128::from(env::storage_usage().saturating_sub(storage_before)));

        let Some(amount) = deposit
            .checked_sub(storage_fee)
            .filter(|amount| !amount.is_zero())
        else {
            self.swaps.remove(&id);
            self.swaps.flush();
            return Err(HtlcError::InsufficientStorageDeposit);
        };

        HtlcEvent::SwapInitiated {
            id: id.into(),
            sender: &sender,
            recipient: &recipient,
            amount,
            storage_fee,
            hashlock: hashlock.into(),
            deadline: U64(deadline.as_nanos()),
        }
        .emit();

        self.swaps
            .insert(id, Swap::new(sender, recipient, amount, hashlock, deadline));
        self.next_nonce += 1;
        Ok(id)
    }

    fn internal_claim(
        &mut self,
        id: SwapId,
        preimage: &Base64VecU8,
        caller: &AccountId,
        now: Timestamp,
    ) -> Result<Release, HtlcError> {
        let swap = self.swaps.get_mut(&id).ok_or(HtlcError::UnknownSwap)?;
        let release = swap.claim(&preimage.0, now)?;

        HtlcEvent::SwapClaimed {
            id: id.into(),
            sender: &swap.sender,
            recipient: &swap.recipient,
            amount: swap.amount,
            preimage: preimage.clone(),
            caller,
        }
        .emit();
        Ok(release)
    }

    fn internal_refund(&mut self, id: SwapId, now: Timestamp) -> Result<Release, HtlcError> {
        let swap = self.swaps.get_mut(&id).ok_or(HtlcError::UnknownSwap)?;
        let release = swap.refund(now)?;

        HtlcEvent::SwapRefunded {
            id: id.into(),
            sender: &swap.sender,
            recipient: &swap.recipient,
            amount: swap.amount,
        }
        .emit();
        Ok(release)
    }

    fn transfer_with_settlement(id: SwapId, release: Release) -> Promise {
        Promise::new(release.beneficiary)
            .transfer(release.amount)
            .then(
                ext_self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_SETTLEMENT)
                    .on_swap_settled(id.into()),
            )
    }

    /// A bounced transfer puts the tokens back on this account, so the swap
    /// goes back to `Active` and can be claimed or refunded again.
    fn resolve_settlement(&mut self, id: SwapId, succeeded: bool) {
        if succeeded {
            env::log_str(&format!(
                "SWAP_SETTLED: id='{}'",
                bs58::encode(&id).into_string()
            ));
            return;
        }

        let Some(swap) = self.swaps.get_mut(&id) else {
            log!("Settlement failed for unknown swap '{}'", bs58::encode(&id).into_string());
            return;
        };
        if let Some(reverted) = swap.revert_release() {
            HtlcEvent::SwapSettlementFailed {
                id: id.into(),
                reverted,
                amount: swap.amount,
            }
            .emit();
        }
    }
}
