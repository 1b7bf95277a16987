use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Storage, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};
use daypot_common::{DrawStatus, DrawTarget};

use crate::error::ContractError;

pub const CONFIG: Item<LotteryConfig> = Item::new("config");
pub const COUNTERS: Item<Counters> = Item::new("counters");
pub const LEDGER: Item<LedgerTotals> = Item::new("ledger");

/// Day buckets of the daily lottery, keyed by `block_time / DAY_SECONDS`.
pub const DAY_POTS: Map<u64, DayPot> = Map::new("day_pots");
pub const DAY_TICKETS: Map<(u64, &Addr), u64> = Map::new("day_tickets");
/// Append-only list of distinct buyers per day, in first-purchase order.
pub const DAY_PARTICIPANTS: Map<(u64, u32), Addr> = Map::new("day_participants");

pub const POOLS: Map<u64, Pool> = Map::new("pools");
pub const POOL_TICKETS: Map<(u64, &Addr), PoolTicket> = Map::new("pool_tickets");
pub const POOL_PARTICIPANTS: Map<(u64, u32), Addr> = Map::new("pool_participants");

/// Pull-payment balances. Only grows until the owner withdraws it.
pub const PENDING_PAYMENTS: Map<&Addr, Uint128> = Map::new("pending_payments");

/// Outstanding randomness requests. An id missing here was either never
/// issued or already consumed.
pub const DRAW_REQUESTS: Map<u64, DrawRequest> = Map::new("draw_requests");

/// Present while an outgoing transfer is in flight.
pub const TRANSFER_LOCK: Item<InFlightTransfer> = Item::new("transfer_lock");

pub const DAY_SECONDS: u64 = 24 * 60 * 60;

/// Pool ids start here so they never overlap day numbers in events and queries.
pub const POOL_ID_OFFSET: u64 = 1_000_000;

#[cw_serde]
pub struct LotteryConfig {
    pub owner: Addr,
    /// Manages pools and receives the admin share of every pot
    pub admin: Addr,
    /// May reassign the payout recipients and the manager role
    pub manager: Addr,
    /// Fixed beneficiary of `PROJECT_SHARE_PCT` of every pot
    pub project: Addr,
    pub randomness_oracle: Addr,
    pub denom: String,
    pub admin_share_pct: u8,
    /// Purchases into the current day are rejected this many seconds before it closes
    pub cooldown_seconds: u64,
    /// How long a draw request may stay unanswered before anyone can re-issue it
    pub rerequest_delay_seconds: u64,
}

#[cw_serde]
pub struct Counters {
    pub next_request_id: u64,
    pub next_pool_id: u64,
}

/// Running totals of everything the contract owes. Together they must equal
/// the funds held by the contract.
#[cw_serde]
#[derive(Default)]
pub struct LedgerTotals {
    pub live_day_pots: Uint128,
    pub live_pool_balances: Uint128,
    pub pending_payments: Uint128,
}

impl LedgerTotals {
    pub fn liabilities(&self) -> StdResult<Uint128> {
        Ok(self
            .live_day_pots
            .checked_add(self.live_pool_balances)?
            .checked_add(self.pending_payments)?)
    }
}

/// Draw bookkeeping shared by day pots and pools.
#[cw_serde]
#[derive(Default)]
pub struct DrawProgress {
    pub status: DrawStatus,
    pub request_id: Option<u64>,
    pub requested_at: Option<Timestamp>,
    pub winner: Option<Addr>,
    /// Pot size at settlement; the live balance is zero afterwards
    pub settled_amount: Uint128,
}

#[cw_serde]
#[derive(Default)]
pub struct DayPot {
    pub amount: Uint128,
    pub total_tickets: u64,
    pub participant_count: u32,
    pub draw: DrawProgress,
}

#[cw_serde]
pub struct Pool {
    pub id: u64,
    pub ticket_price: Uint128,
    pub total_sold: u64,
    pub total_redeemed: u64,
    pub balance: Uint128,
    pub active: bool,
    pub participant_count: u32,
    pub draw: DrawProgress,
}

impl Pool {
    /// Tickets still taking part in the draw.
    pub fn live_tickets(&self) -> u64 {
        self.total_sold.saturating_sub(self.total_redeemed)
    }
}

#[cw_serde]
#[derive(Default)]
pub struct PoolTicket {
    pub purchased: u64,
    pub claimed: u64,
}

impl PoolTicket {
    pub fn live(&self) -> u64 {
        self.purchased.saturating_sub(self.claimed)
    }
}

#[cw_serde]
pub struct DrawRequest {
    pub target: DrawTarget,
    pub requester: Addr,
    pub requested_at: Timestamp,
}

#[cw_serde]
pub struct InFlightTransfer {
    pub recipient: Addr,
    pub amount: Uint128,
}

/// Checked ticket arithmetic.
pub fn add_tickets(current: u64, quantity: u64) -> Result<u64, ContractError> {
    current
        .checked_add(quantity)
        .ok_or_else(|| ContractError::CounterOverflow {
            counter: "tickets".to_string(),
        })
}

/// Next slot in an append-only participant list.
pub fn next_participant(count: u32) -> Result<u32, ContractError> {
    count
        .checked_add(1)
        .ok_or_else(|| ContractError::CounterOverflow {
            counter: "participants".to_string(),
        })
}

/// Apply `f` to the ledger totals and persist the result.
pub fn update_ledger<F>(storage: &mut dyn Storage, f: F) -> Result<LedgerTotals, ContractError>
where
    F: FnOnce(&mut LedgerTotals) -> Result<(), ContractError>,
{
    let mut totals = LEDGER.load(storage)?;
    f(&mut totals)?;
    LEDGER.save(storage, &totals)?;
    Ok(totals)
}

/// Load the draw progress of either kind of target.
pub fn load_progress(storage: &dyn Storage, target: DrawTarget) -> StdResult<Option<DrawProgress>> {
    Ok(match target {
        DrawTarget::Day(day) => DAY_POTS.may_load(storage, day)?.map(|pot| pot.draw),
        DrawTarget::Pool(id) => POOLS.may_load(storage, id)?.map(|pool| pool.draw),
    })
}

/// Collect the ticket-weighted draw population of a target, in list order.
pub fn draw_population(storage: &dyn Storage, target: DrawTarget) -> StdResult<Vec<(Addr, u64)>> {
    match target {
        DrawTarget::Day(day) => {
            let count = DAY_POTS
                .may_load(storage, day)?
                .map(|pot| pot.participant_count)
                .unwrap_or(0);
            (0..count)
                .map(|index| {
                    let addr = DAY_PARTICIPANTS.load(storage, (day, index))?;
                    let tickets = DAY_TICKETS.may_load(storage, (day, &addr))?.unwrap_or(0);
                    Ok((addr, tickets))
                })
                .collect()
        }
        DrawTarget::Pool(id) => {
            let count = POOLS
                .may_load(storage, id)?
                .map(|pool| pool.participant_count)
                .unwrap_or(0);
            (0..count)
                .map(|index| {
                    let addr = POOL_PARTICIPANTS.load(storage, (id, index))?;
                    let tickets = POOL_TICKETS
                        .may_load(storage, (id, &addr))?
                        .unwrap_or_default()
                        .live();
                    Ok((addr, tickets))
                })
                .collect()
        }
    }
}
