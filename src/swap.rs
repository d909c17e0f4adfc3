use near_sdk::json_types::{Base58CryptoHash, U64};
use near_sdk::{near, AccountId, CryptoHash, NearToken, Timestamp};

use crate::errors::HtlcError;
use crate::hashlock::preimage_matches;
use crate::swap_id::SwapId;
use crate::timelocks::Deadline;

#[near(serializers = [json, borsh])]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapStatus {
    Active,
    Claimed,
    Refunded,
}

impl SwapStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SwapStatus::Active)
    }
}

// A single escrow. Everything except `status` is fixed at creation.
#[near(serializers = [borsh])]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Swap {
    pub sender: AccountId,    // Funded the swap, gets the refund
    pub recipient: AccountId, // Gets the value on a valid claim
    pub amount: NearToken,
    pub hashlock: CryptoHash,
    pub deadline: Deadline,
    pub status: SwapStatus,
}

/// Value leaving escrow as the result of a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Release {
    pub beneficiary: AccountId,
    pub amount: NearToken,
}

impl Swap {
    pub fn new(
        sender: AccountId,
        recipient: AccountId,
        amount: NearToken,
        hashlock: CryptoHash,
        deadline: Deadline,
    ) -> Self {
        Self {
            sender,
            recipient,
            amount,
            hashlock,
            deadline,
            status: SwapStatus::Active,
        }
    }

    /// `Active -> Claimed`. Checks run before anything is written, so a
    /// rejected claim leaves the record untouched.
    pub fn claim(&mut self, preimage: &[u8], now: Timestamp) -> Result<Release, HtlcError> {
        self.ensure_active()?;
        if !self.deadline.claim_window_open(now) {
            return Err(HtlcError::Expired);
        }
        if !preimage_matches(&self.hashlock, preimage) {
            return Err(HtlcError::PreimageMismatch);
        }

        self.status = SwapStatus::Claimed;
        Ok(Release {
            beneficiary: self.recipient.clone(),
            amount: self.amount,
        })
    }

    /// `Active -> Refunded`, allowed from the deadline instant onward.
    pub fn refund(&mut self, now: Timestamp) -> Result<Release, HtlcError> {
        self.ensure_active()?;
        if !self.deadline.refund_window_open(now) {
            return Err(HtlcError::NotYetExpired);
        }

        self.status = SwapStatus::Refunded;
        Ok(Release {
            beneficiary: self.sender.clone(),
            amount: self.amount,
        })
    }

    /// Undoes a terminal transition whose transfer bounced back to the
    /// contract. Returns the status that was undone, if any.
    pub fn revert_release(&mut self) -> Option<SwapStatus> {
        if !self.status.is_terminal() {
            return None;
        }
        let undone = self.status;
        self.status = SwapStatus::Active;
        Some(undone)
    }

    fn ensure_active(&self) -> Result<(), HtlcError> {
        if self.status.is_terminal() {
            return Err(HtlcError::AlreadyTerminal);
        }
        Ok(())
    }

    pub fn to_view(&self, id: SwapId) -> SwapView {
        SwapView {
            id: id.into(),
            sender: self.sender.clone(),
            recipient: self.recipient.clone(),
            amount: self.amount,
            hashlock: self.hashlock.into(),
            deadline: U64(self.deadline.as_nanos()),
            status: self.status,
        }
    }
}

/// JSON shape of a swap returned by the view methods.
#[near(serializers = [json])]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapView {
    pub id: Base58CryptoHash,
    pub sender: AccountId,
    pub recipient: AccountId,
    pub amount: NearToken,
    pub hashlock: Base58CryptoHash,
    pub deadline: U64,
    pub status: SwapStatus,
}
