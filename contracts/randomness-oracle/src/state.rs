use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, HexBinary, Timestamp};
use cw_storage_plus::{Item, Map};

use crate::beacon::round_at;

pub const CONFIG: Item<OracleConfig> = Item::new("config");
pub const BEACONS: Map<u64, StoredBeacon> = Map::new("beacons");
pub const LATEST_ROUND: Item<u64> = Item::new("latest_round");
/// Keyed by consumer and the id the consumer chose for the request.
pub const REQUESTS: Map<(&Addr, u64), RandomnessRequest> = Map::new("requests");

#[cw_serde]
pub struct OracleConfig {
    pub admin: Addr,
    /// May submit beacons and fulfill requests
    pub operators: Vec<Addr>,
    /// Contracts allowed to request randomness
    pub consumers: Vec<Addr>,
    /// Quicknet public key, 96 bytes (G2 point)
    pub quicknet_pubkey: HexBinary,
    pub chain_hash: String,
    /// Genesis time of the drand network (unix seconds)
    pub genesis_time: u64,
    /// 3 for quicknet
    pub period_seconds: u64,
}

impl OracleConfig {
    pub fn round_at(&self, time: Timestamp) -> u64 {
        round_at(self.genesis_time, self.period_seconds, time)
    }
}

#[cw_serde]
pub struct StoredBeacon {
    pub round: u64,
    /// sha256(signature)
    pub randomness: HexBinary,
    /// BLS signature on G1, 48 bytes
    pub signature: HexBinary,
    pub submitted_at: Timestamp,
    pub submitted_by: Addr,
}

#[cw_serde]
pub struct RandomnessRequest {
    pub consumer: Addr,
    pub request_id: u64,
    pub trace_tag: String,
    pub requested_at: Timestamp,
    /// The one round that can answer the request: the first published after it
    pub target_round: u64,
    pub fulfilled_round: Option<u64>,
}
