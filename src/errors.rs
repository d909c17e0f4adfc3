use near_sdk::FunctionError;

/// Every way a registry call can be rejected. Returning one of these from a
/// `#[handle_result]` method panics with its message, which reverts the whole
/// receipt (state changes and the attached deposit alike).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, FunctionError)]
pub enum HtlcError {
    #[error("Attached deposit must be strictly positive")]
    InvalidAmount,
    #[error("Attached deposit does not cover the storage of the swap record")]
    InsufficientStorageDeposit,
    #[error("Deadline must be strictly in the future")]
    InvalidDeadline,
    #[error("Hashlock must not be the empty digest")]
    InvalidHashlock,
    #[error("A swap with this id already exists")]
    IdCollision,
    #[error("Swap not found")]
    UnknownSwap,
    #[error("Swap already claimed or refunded")]
    AlreadyTerminal,
    #[error("Preimage does not match the hashlock")]
    PreimageMismatch,
    #[error("Deadline has not passed yet")]
    NotYetExpired,
    #[error("Deadline has already passed")]
    Expired,
}
