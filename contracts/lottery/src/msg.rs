use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128, Uint256};
use daypot_common::{DrawStatus, DrawTarget};

use crate::state::{DrawRequest, LedgerTotals, LotteryConfig, Pool, PoolTicket};

#[cw_serde]
pub struct InstantiateMsg {
    pub admin: String,
    pub manager: String,
    pub project: String,
    pub randomness_oracle: String,
    pub denom: String,
    pub admin_share_pct: u8,
    pub cooldown_seconds: u64,
    pub rerequest_delay_seconds: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Buy a ticket bundle for the current day. Send the exact bundle price.
    BuyTickets { quantity: u32 },
    /// Buy tickets in a prize pool. Send `ticket_price * quantity`.
    BuyPoolTickets { pool_id: u64, quantity: u32 },
    /// Redeem own pool tickets; redeemed tickets leave the draw.
    RedeemPoolTickets { pool_id: u64, quantity: u32 },
    /// Create a prize pool. Admin only.
    CreatePool { ticket_price: Uint128, active: bool },
    /// Change a pool's ticket price. Admin only.
    UpdatePool { pool_id: u64, ticket_price: Uint128 },
    /// Open or close a pool for purchases. Admin only.
    SetPoolActive { pool_id: u64, active: bool },
    /// Top up a pool's balance with the attached funds. Admin only.
    AddLiquidity { pool_id: u64 },
    /// Request randomness for a finished day or a pool. Anyone can call.
    TriggerDraw { target: DrawTarget },
    /// Randomness callback. Oracle only.
    ResolveDraw {
        request_id: u64,
        random_value: Uint256,
    },
    /// Re-issue a randomness request that was never answered. Anyone can call.
    RerequestDraw { target: DrawTarget },
    /// Pull the caller's pending payments.
    Withdraw {},
    /// Reassign payout recipients. Manager only.
    UpdateRecipients {
        project: Option<String>,
        admin: Option<String>,
    },
    /// Hand the manager role to another address. Manager only.
    SetManager { manager: String },
    /// Update runtime parameters. Owner only.
    UpdateConfig {
        admin_share_pct: Option<u8>,
        cooldown_seconds: Option<u64>,
        rerequest_delay_seconds: Option<u64>,
        randomness_oracle: Option<String>,
    },
}

pub struct UpdateConfigParams {
    pub admin_share_pct: Option<u8>,
    pub cooldown_seconds: Option<u64>,
    pub rerequest_delay_seconds: Option<u64>,
    pub randomness_oracle: Option<String>,
}

/// Message sent to the randomness oracle.
#[cw_serde]
pub enum OracleExecuteMsg {
    RequestRandomness { request_id: u64, trace_tag: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(LotteryConfig)]
    Config {},
    #[returns(ClockResponse)]
    Clock {},
    #[returns(Vec<BundlePrice>)]
    Bundles {},
    #[returns(DayPotResponse)]
    DayPot { day: u64 },
    #[returns(bool)]
    IsSettled { target: DrawTarget },
    #[returns(u64)]
    TicketCount { day: u64, address: String },
    #[returns(ParticipantsResponse)]
    DayParticipants {
        day: u64,
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(Pool)]
    Pool { pool_id: u64 },
    #[returns(PoolsResponse)]
    Pools {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(PoolTicket)]
    PoolTickets { pool_id: u64, address: String },
    #[returns(Uint128)]
    PendingPayment { address: String },
    #[returns(Option<DrawRequest>)]
    DrawRequest { request_id: u64 },
    #[returns(SolvencyResponse)]
    Solvency {},
}

#[cw_serde]
pub struct BundlePrice {
    pub quantity: u32,
    pub price: Uint128,
}

#[cw_serde]
pub struct ClockResponse {
    pub current_day: u64,
    pub seconds_until_close: u64,
    pub cooldown_active: bool,
}

#[cw_serde]
pub struct DayPotResponse {
    pub day: u64,
    pub amount: Uint128,
    pub drawn: bool,
    pub status: DrawStatus,
    pub total_tickets: u64,
    pub participant_count: u32,
    pub winner: Option<Addr>,
    pub settled_amount: Uint128,
}

#[cw_serde]
pub struct ParticipantEntry {
    pub index: u32,
    pub address: Addr,
    pub tickets: u64,
}

#[cw_serde]
pub struct ParticipantsResponse {
    pub participants: Vec<ParticipantEntry>,
}

#[cw_serde]
pub struct PoolsResponse {
    pub pools: Vec<Pool>,
}

#[cw_serde]
pub struct SolvencyResponse {
    pub totals: LedgerTotals,
    pub liabilities: Uint128,
    pub held: Uint128,
    pub surplus: Uint128,
}
