use cosmwasm_std::{Addr, StdError};
use thiserror::Error;

use crate::beacon::BeaconError;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("beacon rejected: {0}")]
    Beacon(#[from] BeaconError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("request {request_id} from {consumer} already exists")]
    RequestExists { consumer: Addr, request_id: u64 },

    #[error("no request {request_id} from {consumer}")]
    RequestNotFound { consumer: Addr, request_id: u64 },

    #[error("request {request_id} already fulfilled with round {round}")]
    AlreadyFulfilled { request_id: u64, round: u64 },

    #[error("round {round} cannot answer this request, expected round {target_round}")]
    RoundMismatch { round: u64, target_round: u64 },

    #[error("signature differs from the stored beacon for round {round}")]
    SignatureMismatch { round: u64 },
}
