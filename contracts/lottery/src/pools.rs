use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response, Uint128};
use daypot_common::{DrawStatus, DrawTarget};

use crate::error::ContractError;
use crate::state::{
    update_ledger, DrawProgress, LotteryConfig, Pool, CONFIG, COUNTERS, POOLS,
};

/// Sanity ceiling for a pool ticket price: 1000 whole coins.
pub const MAX_TICKET_PRICE: Uint128 = Uint128::new(1_000_000_000_000_000_000_000);

fn ensure_admin(config: &LotteryConfig, info: &MessageInfo, action: &str) -> Result<(), ContractError> {
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: format!("only admin can {}", action),
        });
    }
    Ok(())
}

pub fn validate_ticket_price(price: Uint128) -> Result<(), ContractError> {
    if price.is_zero() || price > MAX_TICKET_PRICE {
        return Err(ContractError::InvalidTicketPrice {
            price,
            max: MAX_TICKET_PRICE,
        });
    }
    Ok(())
}

/// Create a prize pool. Admin only.
pub fn create_pool(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    ticket_price: Uint128,
    active: bool,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "create pools")?;
    validate_ticket_price(ticket_price)?;

    let mut counters = COUNTERS.load(deps.storage)?;
    let pool_id = counters.next_pool_id;
    counters.next_pool_id = pool_id
        .checked_add(1)
        .ok_or_else(|| ContractError::CounterOverflow {
            counter: "pool id".to_string(),
        })?;
    COUNTERS.save(deps.storage, &counters)?;

    let pool = Pool {
        id: pool_id,
        ticket_price,
        total_sold: 0,
        total_redeemed: 0,
        balance: Uint128::zero(),
        active,
        participant_count: 0,
        draw: DrawProgress::default(),
    };
    POOLS.save(deps.storage, pool_id, &pool)?;

    Ok(Response::new()
        .add_attribute("action", "create_pool")
        .add_attribute("pool_id", pool_id.to_string())
        .add_event(
            Event::new("daypot_pool_created")
                .add_attribute("pool_id", pool_id.to_string())
                .add_attribute("ticket_price", ticket_price.to_string())
                .add_attribute("active", active.to_string()),
        ))
}

/// Change a pool's ticket price. Admin only, pool must still be open.
pub fn update_pool(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    pool_id: u64,
    ticket_price: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "update pools")?;
    validate_ticket_price(ticket_price)?;

    let mut pool = POOLS
        .may_load(deps.storage, pool_id)?
        .ok_or(ContractError::PoolNotFound { pool_id })?;
    if pool.draw.status != DrawStatus::Open {
        return Err(ContractError::AlreadyDrawn {
            target: DrawTarget::Pool(pool_id),
        });
    }

    let old_price = pool.ticket_price;
    pool.ticket_price = ticket_price;
    POOLS.save(deps.storage, pool_id, &pool)?;

    Ok(Response::new()
        .add_attribute("action", "update_pool")
        .add_attribute("pool_id", pool_id.to_string())
        .add_event(
            Event::new("daypot_pool_updated")
                .add_attribute("pool_id", pool_id.to_string())
                .add_attribute("old_ticket_price", old_price.to_string())
                .add_attribute("ticket_price", ticket_price.to_string()),
        ))
}

/// Open or close a pool for purchases. Admin only.
pub fn set_pool_active(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    pool_id: u64,
    active: bool,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "activate pools")?;

    let mut pool = POOLS
        .may_load(deps.storage, pool_id)?
        .ok_or(ContractError::PoolNotFound { pool_id })?;
    pool.active = active;
    POOLS.save(deps.storage, pool_id, &pool)?;

    Ok(Response::new()
        .add_attribute("action", "set_pool_active")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("active", active.to_string()))
}

/// Top up a pool with the attached funds. Admin only. Does not count as sales.
pub fn add_liquidity(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    pool_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "add liquidity")?;

    let amount = match info.funds.as_slice() {
        [coin] if coin.denom == config.denom && !coin.amount.is_zero() => coin.amount,
        _ => {
            return Err(ContractError::NoFundsSent {
                denom: config.denom,
            })
        }
    };

    let mut pool = POOLS
        .may_load(deps.storage, pool_id)?
        .ok_or(ContractError::PoolNotFound { pool_id })?;
    if pool.draw.status == DrawStatus::Settled {
        return Err(ContractError::AlreadyDrawn {
            target: DrawTarget::Pool(pool_id),
        });
    }
    pool.balance = pool.balance.checked_add(amount)?;
    POOLS.save(deps.storage, pool_id, &pool)?;

    update_ledger(deps.storage, |totals| {
        totals.live_pool_balances = totals.live_pool_balances.checked_add(amount)?;
        Ok(())
    })?;

    Ok(Response::new()
        .add_attribute("action", "add_liquidity")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("daypot_pool_funded")
                .add_attribute("pool_id", pool_id.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("new_balance", pool.balance.to_string()),
        ))
}
