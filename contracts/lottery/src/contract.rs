use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdResult,
};
use cw2::set_contract_version;
use daypot_common::validate_admin_share;

use crate::admin::{self, validate_cooldown, validate_rerequest_delay};
use crate::draw;
use crate::error::ContractError;
use crate::guard::{self, TRANSFER_REPLY_ID};
use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg, UpdateConfigParams};
use crate::pools;
use crate::query;
use crate::settlement;
use crate::state::{Counters, LedgerTotals, LotteryConfig, CONFIG, COUNTERS, LEDGER, POOL_ID_OFFSET};
use crate::tickets;

const CONTRACT_NAME: &str = "crates.io:daypot-lottery";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    validate_admin_share(msg.admin_share_pct)?;
    validate_cooldown(msg.cooldown_seconds)?;
    validate_rerequest_delay(msg.rerequest_delay_seconds)?;
    if msg.denom.is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "denom must not be empty".to_string(),
        });
    }

    let config = LotteryConfig {
        owner: info.sender.clone(),
        admin: deps.api.addr_validate(&msg.admin)?,
        manager: deps.api.addr_validate(&msg.manager)?,
        project: deps.api.addr_validate(&msg.project)?,
        randomness_oracle: deps.api.addr_validate(&msg.randomness_oracle)?,
        denom: msg.denom,
        admin_share_pct: msg.admin_share_pct,
        cooldown_seconds: msg.cooldown_seconds,
        rerequest_delay_seconds: msg.rerequest_delay_seconds,
    };
    CONFIG.save(deps.storage, &config)?;

    COUNTERS.save(
        deps.storage,
        &Counters {
            next_request_id: 1,
            next_pool_id: POOL_ID_OFFSET,
        },
    )?;
    LEDGER.save(deps.storage, &LedgerTotals::default())?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "lottery")
        .add_attribute("owner", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    guard::ensure_unlocked(deps.storage)?;

    match msg {
        ExecuteMsg::BuyTickets { quantity } => tickets::buy_tickets(deps, env, info, quantity),
        ExecuteMsg::BuyPoolTickets { pool_id, quantity } => {
            tickets::buy_pool_tickets(deps, env, info, pool_id, quantity)
        }
        ExecuteMsg::RedeemPoolTickets { pool_id, quantity } => {
            tickets::redeem_pool_tickets(deps, env, info, pool_id, quantity)
        }
        ExecuteMsg::CreatePool {
            ticket_price,
            active,
        } => pools::create_pool(deps, env, info, ticket_price, active),
        ExecuteMsg::UpdatePool {
            pool_id,
            ticket_price,
        } => pools::update_pool(deps, env, info, pool_id, ticket_price),
        ExecuteMsg::SetPoolActive { pool_id, active } => {
            pools::set_pool_active(deps, env, info, pool_id, active)
        }
        ExecuteMsg::AddLiquidity { pool_id } => pools::add_liquidity(deps, env, info, pool_id),
        ExecuteMsg::TriggerDraw { target } => draw::trigger_draw(deps, env, info, target),
        ExecuteMsg::ResolveDraw {
            request_id,
            random_value,
        } => draw::resolve_draw(deps, env, info, request_id, random_value),
        ExecuteMsg::RerequestDraw { target } => draw::rerequest_draw(deps, env, info, target),
        ExecuteMsg::Withdraw {} => settlement::withdraw(deps, env, info),
        ExecuteMsg::UpdateRecipients { project, admin } => {
            admin::update_recipients(deps, env, info, project, admin)
        }
        ExecuteMsg::SetManager { manager } => admin::set_manager(deps, env, info, manager),
        ExecuteMsg::UpdateConfig {
            admin_share_pct,
            cooldown_seconds,
            rerequest_delay_seconds,
            randomness_oracle,
        } => admin::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                admin_share_pct,
                cooldown_seconds,
                rerequest_delay_seconds,
                randomness_oracle,
            },
        ),
    }
}

#[entry_point]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        TRANSFER_REPLY_ID => settlement::handle_transfer_reply(deps, env, msg),
        id => Err(ContractError::UnknownReply { id }),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Clock {} => query::query_clock(deps, env),
        QueryMsg::Bundles {} => query::query_bundles(),
        QueryMsg::DayPot { day } => query::query_day_pot(deps, day),
        QueryMsg::IsSettled { target } => query::query_is_settled(deps, target),
        QueryMsg::TicketCount { day, address } => query::query_ticket_count(deps, day, address),
        QueryMsg::DayParticipants {
            day,
            start_after,
            limit,
        } => query::query_day_participants(deps, day, start_after, limit),
        QueryMsg::Pool { pool_id } => query::query_pool(deps, pool_id),
        QueryMsg::Pools { start_after, limit } => query::query_pools(deps, start_after, limit),
        QueryMsg::PoolTickets { pool_id, address } => {
            query::query_pool_tickets(deps, pool_id, address)
        }
        QueryMsg::PendingPayment { address } => query::query_pending_payment(deps, address),
        QueryMsg::DrawRequest { request_id } => query::query_draw_request(deps, request_id),
        QueryMsg::Solvency {} => query::query_solvency(deps, env),
    }
}
