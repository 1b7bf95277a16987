use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint256;

use crate::state::{OracleConfig, RandomnessRequest, StoredBeacon};

#[cw_serde]
pub struct InstantiateMsg {
    pub operators: Vec<String>,
    pub consumers: Vec<String>,
    /// Hex-encoded quicknet public key (96 bytes = 192 hex chars)
    pub quicknet_pubkey_hex: String,
    pub chain_hash: String,
    pub genesis_time: u64,
    pub period_seconds: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Ask for randomness. Registered consumers only.
    RequestRandomness { request_id: u64, trace_tag: String },
    /// Answer a request with a drand beacon and call the consumer back. Operators only.
    FulfillRandomness {
        consumer: String,
        request_id: u64,
        round: u64,
        /// Hex-encoded BLS signature (48 bytes = 96 hex chars)
        signature_hex: String,
    },
    /// Admin only.
    UpdateOperators {
        add: Vec<String>,
        remove: Vec<String>,
    },
    /// Admin only.
    UpdateConsumers {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

/// Callback delivered to the consumer that made the request.
#[cw_serde]
pub enum ConsumerExecuteMsg {
    ResolveDraw {
        request_id: u64,
        random_value: Uint256,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(OracleConfig)]
    Config {},

    #[returns(Option<RandomnessRequest>)]
    Request { consumer: String, request_id: u64 },

    #[returns(Option<StoredBeacon>)]
    Beacon { round: u64 },

    #[returns(u64)]
    LatestRound {},
}
