use cosmwasm_std::{OverflowError, StdError, Uint128};
use daypot_common::{DrawTarget, SplitError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    Split(#[from] SplitError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    // ── Input validation ──
    #[error("invalid ticket quantity: {quantity}")]
    InvalidQuantity { quantity: u32 },

    #[error("incorrect payment: expected {expected}, received {received}")]
    IncorrectPayment { expected: Uint128, received: String },

    #[error("invalid ticket price {price} (must be in 1..={max})")]
    InvalidTicketPrice { price: Uint128, max: Uint128 },

    #[error("invalid address: {reason}")]
    InvalidAddress { reason: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("must send {denom} to add liquidity")]
    NoFundsSent { denom: String },

    // ── State machine ──
    #[error("ticket sales for day {day} are closed until {reopens_at}")]
    CooldownActive { day: u64, reopens_at: u64 },

    #[error("pool {pool_id} not found")]
    PoolNotFound { pool_id: u64 },

    #[error("pool {pool_id} is not active")]
    PoolNotActive { pool_id: u64 },

    #[error("{target} has already been drawn")]
    AlreadyDrawn { target: DrawTarget },

    #[error("{target} has no participants")]
    NoParticipants { target: DrawTarget },

    #[error("{target} has an empty pot")]
    InsufficientPot { target: DrawTarget },

    #[error("day {day} cannot be drawn, only the previous day {previous} can")]
    NotPreviousDay { day: u64, previous: u64 },

    #[error("{target} has no draw in progress")]
    DrawNotPending { target: DrawTarget },

    #[error("draw for {target} cannot be re-requested before {available_at}")]
    RerequestTooSoon { target: DrawTarget, available_at: u64 },

    #[error("nothing to withdraw")]
    NothingToWithdraw,

    // ── Integrity ──
    #[error("randomness request {request_id} is unknown or already consumed")]
    InvalidRequest { request_id: u64 },

    #[error("{target} pot does not match the settled amount")]
    PotMismatch { target: DrawTarget },

    #[error("no winner found in {target} for random value")]
    WinnerNotFound { target: DrawTarget },

    #[error("re-entrant call while a transfer is in flight")]
    ReentrantCall,

    #[error("transfer failed: {reason}")]
    TransferFailed { reason: String },

    #[error("counter overflow: {counter}")]
    CounterOverflow { counter: String },

    #[error("unknown reply id {id}")]
    UnknownReply { id: u64 },
}
