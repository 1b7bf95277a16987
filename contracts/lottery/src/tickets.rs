use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response, Timestamp, Uint128};
use daypot_common::{DrawStatus, DrawTarget};

use crate::error::ContractError;
use crate::msg::BundlePrice;
use crate::state::{
    add_tickets, next_participant, update_ledger, CONFIG, DAY_PARTICIPANTS, DAY_POTS,
    DAY_SECONDS, DAY_TICKETS, POOLS, POOL_PARTICIPANTS, POOL_TICKETS,
};

/// 10^16 base units = 0.01 of an 18-decimal coin.
const CENT: u128 = 10_000_000_000_000_000;

/// Allowed daily bundles and their fixed prices.
pub const BUNDLES: [(u32, Uint128); 3] = [
    (1, Uint128::new(CENT)),
    (5, Uint128::new(48 * CENT / 10)),
    (20, Uint128::new(18 * CENT)),
];

/// Upper bound on a single pool purchase, keeps `price * quantity` far from overflow.
pub const MAX_POOL_QUANTITY: u32 = 1_000;

pub fn bundle_price(quantity: u32) -> Option<Uint128> {
    BUNDLES
        .iter()
        .find(|(size, _)| *size == quantity)
        .map(|(_, price)| *price)
}

pub fn bundles() -> Vec<BundlePrice> {
    BUNDLES
        .iter()
        .map(|(quantity, price)| BundlePrice {
            quantity: *quantity,
            price: *price,
        })
        .collect()
}

pub fn day_of(time: Timestamp) -> u64 {
    time.seconds() / DAY_SECONDS
}

pub fn seconds_until_close(time: Timestamp) -> u64 {
    DAY_SECONDS - time.seconds() % DAY_SECONDS
}

/// Sales into the running day stop for the last `cooldown_seconds` of it.
pub fn in_cooldown(time: Timestamp, cooldown_seconds: u64) -> bool {
    seconds_until_close(time) <= cooldown_seconds
}

/// The caller must attach exactly `expected` of `denom` and nothing else.
pub fn ensure_exact_payment(
    info: &MessageInfo,
    denom: &str,
    expected: Uint128,
) -> Result<(), ContractError> {
    match info.funds.as_slice() {
        [coin] if coin.denom == denom && coin.amount == expected => Ok(()),
        funds => Err(ContractError::IncorrectPayment {
            expected,
            received: if funds.is_empty() {
                "nothing".to_string()
            } else {
                funds
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            },
        }),
    }
}

/// Buy a ticket bundle in the current day bucket.
pub fn buy_tickets(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    quantity: u32,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let day = day_of(env.block.time);

    if in_cooldown(env.block.time, config.cooldown_seconds) {
        return Err(ContractError::CooldownActive {
            day,
            reopens_at: (day + 1) * DAY_SECONDS,
        });
    }

    let price = bundle_price(quantity).ok_or(ContractError::InvalidQuantity { quantity })?;
    ensure_exact_payment(&info, &config.denom, price)?;

    let mut pot = DAY_POTS.may_load(deps.storage, day)?.unwrap_or_default();

    // One list entry per distinct buyer; weight lives in DAY_TICKETS
    let held = DAY_TICKETS.may_load(deps.storage, (day, &info.sender))?;
    if held.is_none() {
        DAY_PARTICIPANTS.save(deps.storage, (day, pot.participant_count), &info.sender)?;
        pot.participant_count = next_participant(pot.participant_count)?;
    }
    let tickets = add_tickets(held.unwrap_or(0), u64::from(quantity))?;
    DAY_TICKETS.save(deps.storage, (day, &info.sender), &tickets)?;

    pot.total_tickets = add_tickets(pot.total_tickets, u64::from(quantity))?;
    pot.amount = pot.amount.checked_add(price)?;
    DAY_POTS.save(deps.storage, day, &pot)?;

    update_ledger(deps.storage, |totals| {
        totals.live_day_pots = totals.live_day_pots.checked_add(price)?;
        Ok(())
    })?;

    Ok(Response::new()
        .add_attribute("action", "buy_tickets")
        .add_attribute("buyer", info.sender.to_string())
        .add_attribute("day", day.to_string())
        .add_attribute("quantity", quantity.to_string())
        .add_event(
            Event::new("daypot_tickets_bought")
                .add_attribute("target", DrawTarget::Day(day).trace_tag())
                .add_attribute("buyer", info.sender.to_string())
                .add_attribute("quantity", quantity.to_string())
                .add_attribute("price", price.to_string())
                .add_attribute("buyer_tickets", tickets.to_string())
                .add_attribute("pot", pot.amount.to_string()),
        ))
}

/// Buy tickets in a prize pool at the pool's ticket price.
pub fn buy_pool_tickets(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    pool_id: u64,
    quantity: u32,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let mut pool = POOLS
        .may_load(deps.storage, pool_id)?
        .filter(|pool| !pool.ticket_price.is_zero())
        .ok_or(ContractError::PoolNotFound { pool_id })?;
    if !pool.active {
        return Err(ContractError::PoolNotActive { pool_id });
    }
    if pool.draw.status != DrawStatus::Open {
        return Err(ContractError::AlreadyDrawn {
            target: DrawTarget::Pool(pool_id),
        });
    }

    if quantity == 0 || quantity > MAX_POOL_QUANTITY {
        return Err(ContractError::InvalidQuantity { quantity });
    }
    let price = pool
        .ticket_price
        .checked_mul(Uint128::from(quantity))
        .map_err(|_| ContractError::InvalidQuantity { quantity })?;
    if price / pool.ticket_price != Uint128::from(quantity) {
        return Err(ContractError::InvalidQuantity { quantity });
    }
    ensure_exact_payment(&info, &config.denom, price)?;

    let held = POOL_TICKETS.may_load(deps.storage, (pool_id, &info.sender))?;
    if held.is_none() {
        POOL_PARTICIPANTS.save(deps.storage, (pool_id, pool.participant_count), &info.sender)?;
        pool.participant_count = next_participant(pool.participant_count)?;
    }
    let mut ticket = held.unwrap_or_default();
    ticket.purchased = add_tickets(ticket.purchased, u64::from(quantity))?;
    POOL_TICKETS.save(deps.storage, (pool_id, &info.sender), &ticket)?;

    pool.total_sold = add_tickets(pool.total_sold, u64::from(quantity))?;
    pool.balance = pool.balance.checked_add(price)?;
    POOLS.save(deps.storage, pool_id, &pool)?;

    update_ledger(deps.storage, |totals| {
        totals.live_pool_balances = totals.live_pool_balances.checked_add(price)?;
        Ok(())
    })?;

    Ok(Response::new()
        .add_attribute("action", "buy_pool_tickets")
        .add_attribute("buyer", info.sender.to_string())
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("quantity", quantity.to_string())
        .add_event(
            Event::new("daypot_tickets_bought")
                .add_attribute("target", DrawTarget::Pool(pool_id).trace_tag())
                .add_attribute("buyer", info.sender.to_string())
                .add_attribute("quantity", quantity.to_string())
                .add_attribute("price", price.to_string())
                .add_attribute("buyer_tickets", ticket.purchased.to_string())
                .add_attribute("pot", pool.balance.to_string()),
        ))
}

/// Redeem some of the caller's pool tickets. Funds stay in the pool; the
/// redeemed tickets no longer count towards the draw.
pub fn redeem_pool_tickets(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    pool_id: u64,
    quantity: u32,
) -> Result<Response, ContractError> {
    let mut pool = POOLS
        .may_load(deps.storage, pool_id)?
        .ok_or(ContractError::PoolNotFound { pool_id })?;
    if pool.draw.status != DrawStatus::Open {
        return Err(ContractError::AlreadyDrawn {
            target: DrawTarget::Pool(pool_id),
        });
    }

    let mut ticket = POOL_TICKETS
        .may_load(deps.storage, (pool_id, &info.sender))?
        .unwrap_or_default();
    if quantity == 0 || u64::from(quantity) > ticket.live() {
        return Err(ContractError::InvalidQuantity { quantity });
    }

    ticket.claimed = add_tickets(ticket.claimed, u64::from(quantity))?;
    POOL_TICKETS.save(deps.storage, (pool_id, &info.sender), &ticket)?;

    pool.total_redeemed = add_tickets(pool.total_redeemed, u64::from(quantity))?;
    POOLS.save(deps.storage, pool_id, &pool)?;

    Ok(Response::new()
        .add_attribute("action", "redeem_pool_tickets")
        .add_attribute("holder", info.sender.to_string())
        .add_attribute("pool_id", pool_id.to_string())
        .add_event(
            Event::new("daypot_pool_tickets_redeemed")
                .add_attribute("pool_id", pool_id.to_string())
                .add_attribute("holder", info.sender.to_string())
                .add_attribute("quantity", quantity.to_string())
                .add_attribute("claimed", ticket.claimed.to_string())
                .add_attribute("total_redeemed", pool.total_redeemed.to_string()),
        ))
}
