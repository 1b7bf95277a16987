use cosmwasm_std::{
    to_json_binary, Addr, Api, DepsMut, Env, Event, HexBinary, MessageInfo, Response, StdResult,
    Uint256, WasmMsg,
};

use crate::beacon::verify_quicknet_beacon;
use crate::error::ContractError;
use crate::msg::ConsumerExecuteMsg;
use crate::state::{RandomnessRequest, StoredBeacon, BEACONS, CONFIG, LATEST_ROUND, REQUESTS};

/// Register a randomness request. Consumers only.
///
/// The request is pinned to the first round published after this block.
pub fn request_randomness(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    trace_tag: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if !config.consumers.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only registered consumers can request randomness".to_string(),
        });
    }

    let key = (&info.sender, request_id);
    if REQUESTS.has(deps.storage, key) {
        return Err(ContractError::RequestExists {
            consumer: info.sender,
            request_id,
        });
    }

    let target_round = config.round_at(env.block.time) + 1;
    let request = RandomnessRequest {
        consumer: info.sender.clone(),
        request_id,
        trace_tag,
        requested_at: env.block.time,
        target_round,
        fulfilled_round: None,
    };
    REQUESTS.save(deps.storage, key, &request)?;

    Ok(Response::new()
        .add_attribute("action", "request_randomness")
        .add_attribute("consumer", info.sender.to_string())
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("daypot_randomness_requested")
                .add_attribute("consumer", info.sender.to_string())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("trace_tag", request.trace_tag)
                .add_attribute("target_round", target_round.to_string()),
        ))
}

/// Answer a pending request with a quicknet beacon and forward the random
/// value to the consumer. Operators only.
///
/// A beacon already stored for `round` is reused; otherwise it is
/// BLS-verified and stored first.
pub fn fulfill_randomness(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    consumer: String,
    request_id: u64,
    round: u64,
    signature_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if !config.operators.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only operators can fulfill randomness".to_string(),
        });
    }

    let consumer = deps.api.addr_validate(&consumer)?;
    let mut request = REQUESTS
        .may_load(deps.storage, (&consumer, request_id))?
        .ok_or_else(|| ContractError::RequestNotFound {
            consumer: consumer.clone(),
            request_id,
        })?;
    if let Some(round) = request.fulfilled_round {
        return Err(ContractError::AlreadyFulfilled { request_id, round });
    }
    if round != request.target_round {
        return Err(ContractError::RoundMismatch {
            round,
            target_round: request.target_round,
        });
    }

    let signature = HexBinary::from_hex(&signature_hex).map_err(|_| ContractError::InvalidHex {
        field: "signature_hex".to_string(),
    })?;

    let cached = BEACONS.may_load(deps.storage, round)?;
    let reused = cached.is_some();
    let beacon = match cached {
        Some(stored) => {
            if stored.signature != signature {
                return Err(ContractError::SignatureMismatch { round });
            }
            stored
        }
        None => {
            let randomness =
                verify_quicknet_beacon(config.quicknet_pubkey.as_slice(), round, &signature)?;
            let beacon = StoredBeacon {
                round,
                randomness: HexBinary::from(randomness),
                signature,
                submitted_at: env.block.time,
                submitted_by: info.sender.clone(),
            };
            BEACONS.save(deps.storage, round, &beacon)?;

            let latest = LATEST_ROUND.may_load(deps.storage)?.unwrap_or(0);
            if round > latest {
                LATEST_ROUND.save(deps.storage, &round)?;
            }
            beacon
        }
    };

    request.fulfilled_round = Some(round);
    REQUESTS.save(deps.storage, (&consumer, request_id), &request)?;

    let random_value = Uint256::from_be_bytes(beacon.randomness.to_array::<32>()?);
    let callback = WasmMsg::Execute {
        contract_addr: consumer.to_string(),
        msg: to_json_binary(&ConsumerExecuteMsg::ResolveDraw {
            request_id,
            random_value,
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_message(callback)
        .add_attribute("action", "fulfill_randomness")
        .add_attribute("consumer", consumer.to_string())
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("round", round.to_string())
        .add_event(
            Event::new("daypot_randomness_fulfilled")
                .add_attribute("consumer", consumer.to_string())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("trace_tag", request.trace_tag)
                .add_attribute("round", round.to_string())
                .add_attribute("randomness", beacon.randomness.to_hex())
                .add_attribute("reused_beacon", reused.to_string())
                .add_attribute("operator", info.sender.to_string()),
        ))
}

fn apply_membership(
    api: &dyn Api,
    members: &mut Vec<Addr>,
    add: &[String],
    remove: &[String],
) -> StdResult<()> {
    for addr in remove {
        let addr = api.addr_validate(addr)?;
        members.retain(|a| *a != addr);
    }
    for addr in add {
        let addr = api.addr_validate(addr)?;
        if !members.contains(&addr) {
            members.push(addr);
        }
    }
    Ok(())
}

/// Update the operator list. Admin only.
pub fn update_operators(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update operators".to_string(),
        });
    }

    apply_membership(deps.api, &mut config.operators, &add, &remove)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_operators")
        .add_attribute("added", add.join(","))
        .add_attribute("removed", remove.join(",")))
}

/// Update the consumer list. Admin only.
pub fn update_consumers(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update consumers".to_string(),
        });
    }

    apply_membership(deps.api, &mut config.consumers, &add, &remove)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_consumers")
        .add_attribute("added", add.join(","))
        .add_attribute("removed", remove.join(",")))
}
