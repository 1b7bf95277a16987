use cosmwasm_std::{
    to_json_binary, Addr, DepsMut, Env, Event, MessageInfo, Response, Storage, Timestamp, Uint128,
    Uint256, WasmMsg,
};
use daypot_common::{delay_elapsed, pick_winner, DrawStatus, DrawTarget};

use crate::error::ContractError;
use crate::msg::OracleExecuteMsg;
use crate::settlement;
use crate::state::{
    draw_population, load_progress, DrawProgress, DrawRequest, LotteryConfig, CONFIG, COUNTERS,
    DAY_POTS, DRAW_REQUESTS, POOLS,
};
use crate::tickets::day_of;

/// What the engine needs to know about a target before drawing it.
struct TargetSnapshot {
    progress: DrawProgress,
    participant_count: u32,
    live_tickets: u64,
    pot: Uint128,
}

fn snapshot(storage: &dyn Storage, target: DrawTarget) -> Result<TargetSnapshot, ContractError> {
    match target {
        DrawTarget::Day(day) => {
            let pot = DAY_POTS
                .may_load(storage, day)?
                .ok_or(ContractError::NoParticipants { target })?;
            Ok(TargetSnapshot {
                progress: pot.draw,
                participant_count: pot.participant_count,
                live_tickets: pot.total_tickets,
                pot: pot.amount,
            })
        }
        DrawTarget::Pool(pool_id) => {
            let pool = POOLS
                .may_load(storage, pool_id)?
                .ok_or(ContractError::PoolNotFound { pool_id })?;
            Ok(TargetSnapshot {
                live_tickets: pool.live_tickets(),
                participant_count: pool.participant_count,
                pot: pool.balance,
                progress: pool.draw,
            })
        }
    }
}

fn save_progress(
    storage: &mut dyn Storage,
    target: DrawTarget,
    progress: DrawProgress,
) -> Result<(), ContractError> {
    match target {
        DrawTarget::Day(day) => {
            let mut pot = DAY_POTS.load(storage, day)?;
            pot.draw = progress;
            DAY_POTS.save(storage, day, &pot)?;
        }
        DrawTarget::Pool(pool_id) => {
            let mut pool = POOLS.load(storage, pool_id)?;
            pool.draw = progress;
            POOLS.save(storage, pool_id, &pool)?;
        }
    }
    Ok(())
}

/// Record a pending request for `target` and build the oracle message for it.
fn issue_request(
    storage: &mut dyn Storage,
    env: &Env,
    config: &LotteryConfig,
    target: DrawTarget,
    requester: &Addr,
) -> Result<(u64, WasmMsg), ContractError> {
    let mut counters = COUNTERS.load(storage)?;
    let request_id = counters.next_request_id;
    counters.next_request_id = request_id
        .checked_add(1)
        .ok_or_else(|| ContractError::CounterOverflow {
            counter: "request id".to_string(),
        })?;
    COUNTERS.save(storage, &counters)?;

    DRAW_REQUESTS.save(
        storage,
        request_id,
        &DrawRequest {
            target,
            requester: requester.clone(),
            requested_at: env.block.time,
        },
    )?;

    let msg = WasmMsg::Execute {
        contract_addr: config.randomness_oracle.to_string(),
        msg: to_json_binary(&OracleExecuteMsg::RequestRandomness {
            request_id,
            trace_tag: target.trace_tag(),
        })?,
        funds: vec![],
    };
    Ok((request_id, msg))
}

/// Start the draw of a finished day or a pool. Anyone can call.
///
/// Latches the target in `DrawRequested` and asks the oracle for randomness;
/// nothing is paid out until the oracle answers.
///
/// A day pot can only be triggered during the following day. If nobody
/// triggers it then, the pot stays open with its funds undrawn; there is no
/// late draw for it. `RerequestDraw` only covers a draw that was triggered.
pub fn trigger_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    target: DrawTarget,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if let DrawTarget::Day(day) = target {
        // Only the day that just closed; the running day still takes purchases
        let current = day_of(env.block.time);
        let previous = current.saturating_sub(1);
        if current == 0 || day != previous {
            return Err(ContractError::NotPreviousDay { day, previous });
        }
    }

    let snap = snapshot(deps.storage, target)?;
    if snap.progress.status != DrawStatus::Open {
        return Err(ContractError::AlreadyDrawn { target });
    }
    if snap.participant_count == 0 || snap.live_tickets == 0 {
        return Err(ContractError::NoParticipants { target });
    }
    if snap.pot.is_zero() {
        return Err(ContractError::InsufficientPot { target });
    }

    let (request_id, msg) = issue_request(deps.storage, &env, &config, target, &info.sender)?;

    let progress = DrawProgress {
        status: DrawStatus::DrawRequested,
        request_id: Some(request_id),
        requested_at: Some(env.block.time),
        ..snap.progress
    };
    save_progress(deps.storage, target, progress)?;

    Ok(Response::new()
        .add_message(msg)
        .add_attribute("action", "trigger_draw")
        .add_attribute("target", target.trace_tag())
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("daypot_draw_requested")
                .add_attribute("target", target.trace_tag())
                .add_attribute("status", DrawStatus::DrawRequested.as_str())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("requester", info.sender.to_string())
                .add_attribute("pot", snap.pot.to_string())
                .add_attribute("tickets", snap.live_tickets.to_string())
                .add_attribute("participants", snap.participant_count.to_string()),
        ))
}

/// Randomness callback. Oracle only.
///
/// Consumes the pending request (a second delivery of the same id fails),
/// picks the ticket-weighted winner and settles the pot.
pub fn resolve_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    random_value: Uint256,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.randomness_oracle {
        return Err(ContractError::Unauthorized {
            reason: "only the randomness oracle can resolve draws".to_string(),
        });
    }

    let request = DRAW_REQUESTS
        .may_load(deps.storage, request_id)?
        .ok_or(ContractError::InvalidRequest { request_id })?;
    DRAW_REQUESTS.remove(deps.storage, request_id);

    let target = request.target;
    let progress = load_progress(deps.storage, target)?
        .ok_or(ContractError::InvalidRequest { request_id })?;
    if progress.status != DrawStatus::DrawRequested || progress.request_id != Some(request_id) {
        return Err(ContractError::InvalidRequest { request_id });
    }

    let population = draw_population(deps.storage, target)?;
    let total_tickets = population
        .iter()
        .try_fold(0u64, |acc, (_, tickets)| acc.checked_add(*tickets))
        .ok_or_else(|| ContractError::CounterOverflow {
            counter: "tickets".to_string(),
        })?;
    let winner = pick_winner(random_value, total_tickets, population)
        .ok_or(ContractError::WinnerNotFound { target })?;

    let pot_amount = snapshot(deps.storage, target)?.pot;
    let settled = settlement::settle(
        deps.storage,
        &env.contract.address,
        target,
        &winner,
        pot_amount,
    )?;

    Ok(Response::new()
        .add_attribute("action", "resolve_draw")
        .add_attribute("target", target.trace_tag())
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("winner", winner.to_string())
        .add_event(
            Event::new("daypot_draw_settled")
                .add_attribute("target", target.trace_tag())
                .add_attribute("status", DrawStatus::Settled.as_str())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("random_value", random_value.to_string())
                .add_attribute("total_tickets", total_tickets.to_string())
                .add_attribute("winner", winner.to_string())
                .add_attribute("pot", pot_amount.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        )
        .add_events(settled.credit_events()))
}

/// Re-issue the randomness request of a draw that was never answered.
/// Anyone can call once `rerequest_delay_seconds` have passed.
pub fn rerequest_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    target: DrawTarget,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let progress = load_progress(deps.storage, target)?
        .filter(|progress| progress.status == DrawStatus::DrawRequested)
        .ok_or(ContractError::DrawNotPending { target })?;

    let requested_at = progress
        .requested_at
        .unwrap_or_else(|| Timestamp::from_seconds(0));
    if !delay_elapsed(requested_at, config.rerequest_delay_seconds, env.block.time) {
        return Err(ContractError::RerequestTooSoon {
            target,
            available_at: requested_at
                .seconds()
                .saturating_add(config.rerequest_delay_seconds),
        });
    }

    // A late answer to the stale request is rejected as unknown
    if let Some(stale) = progress.request_id {
        DRAW_REQUESTS.remove(deps.storage, stale);
    }

    let (request_id, msg) = issue_request(deps.storage, &env, &config, target, &info.sender)?;
    let stale = progress.request_id;
    save_progress(
        deps.storage,
        target,
        DrawProgress {
            request_id: Some(request_id),
            requested_at: Some(env.block.time),
            ..progress
        },
    )?;

    Ok(Response::new()
        .add_message(msg)
        .add_attribute("action", "rerequest_draw")
        .add_attribute("target", target.trace_tag())
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("daypot_draw_rerequested")
                .add_attribute("target", target.trace_tag())
                .add_attribute(
                    "stale_request_id",
                    stale.map(|id| id.to_string()).unwrap_or_default(),
                )
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("requester", info.sender.to_string()),
        ))
}
