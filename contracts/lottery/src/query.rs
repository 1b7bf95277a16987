use cosmwasm_std::{to_json_binary, Binary, Deps, Env, Order, StdResult};
use cw_storage_plus::Bound;
use daypot_common::{DrawStatus, DrawTarget};

use crate::msg::{
    ClockResponse, DayPotResponse, ParticipantEntry, ParticipantsResponse, PoolsResponse,
    SolvencyResponse,
};
use crate::state::{
    load_progress, CONFIG, DAY_PARTICIPANTS, DAY_POTS, DAY_TICKETS, DRAW_REQUESTS, LEDGER,
    PENDING_PAYMENTS, POOLS, POOL_TICKETS,
};
use crate::tickets::{bundles, day_of, in_cooldown, seconds_until_close};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_clock(deps: Deps, env: Env) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&ClockResponse {
        current_day: day_of(env.block.time),
        seconds_until_close: seconds_until_close(env.block.time),
        cooldown_active: in_cooldown(env.block.time, config.cooldown_seconds),
    })
}

pub fn query_bundles() -> StdResult<Binary> {
    to_json_binary(&bundles())
}

pub fn query_day_pot(deps: Deps, day: u64) -> StdResult<Binary> {
    let pot = DAY_POTS.may_load(deps.storage, day)?.unwrap_or_default();
    to_json_binary(&DayPotResponse {
        day,
        amount: pot.amount,
        drawn: pot.draw.status == DrawStatus::Settled,
        status: pot.draw.status,
        total_tickets: pot.total_tickets,
        participant_count: pot.participant_count,
        winner: pot.draw.winner,
        settled_amount: pot.draw.settled_amount,
    })
}

pub fn query_is_settled(deps: Deps, target: DrawTarget) -> StdResult<Binary> {
    let settled = load_progress(deps.storage, target)?
        .map(|progress| progress.status == DrawStatus::Settled)
        .unwrap_or(false);
    to_json_binary(&settled)
}

pub fn query_ticket_count(deps: Deps, day: u64, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let tickets = DAY_TICKETS
        .may_load(deps.storage, (day, &addr))?
        .unwrap_or(0);
    to_json_binary(&tickets)
}

pub fn query_day_participants(
    deps: Deps,
    day: u64,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let participants = DAY_PARTICIPANTS
        .prefix(day)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (index, address) = item?;
            let tickets = DAY_TICKETS
                .may_load(deps.storage, (day, &address))?
                .unwrap_or(0);
            Ok(ParticipantEntry {
                index,
                address,
                tickets,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&ParticipantsResponse { participants })
}

pub fn query_pool(deps: Deps, pool_id: u64) -> StdResult<Binary> {
    let pool = POOLS.load(deps.storage, pool_id)?;
    to_json_binary(&pool)
}

pub fn query_pools(deps: Deps, start_after: Option<u64>, limit: Option<u32>) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let pools: Vec<_> = POOLS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, pool)| pool)
        .collect();

    to_json_binary(&PoolsResponse { pools })
}

pub fn query_pool_tickets(deps: Deps, pool_id: u64, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let ticket = POOL_TICKETS
        .may_load(deps.storage, (pool_id, &addr))?
        .unwrap_or_default();
    to_json_binary(&ticket)
}

pub fn query_pending_payment(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let balance = PENDING_PAYMENTS
        .may_load(deps.storage, &addr)?
        .unwrap_or_default();
    to_json_binary(&balance)
}

pub fn query_draw_request(deps: Deps, request_id: u64) -> StdResult<Binary> {
    let request = DRAW_REQUESTS.may_load(deps.storage, request_id)?;
    to_json_binary(&request)
}

pub fn query_solvency(deps: Deps, env: Env) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let totals = LEDGER.load(deps.storage)?;
    let liabilities = totals.liabilities()?;
    let held = deps
        .querier
        .query_balance(env.contract.address.to_string(), config.denom)?
        .amount;

    to_json_binary(&SolvencyResponse {
        totals,
        liabilities,
        held,
        surplus: held.saturating_sub(liabilities),
    })
}
