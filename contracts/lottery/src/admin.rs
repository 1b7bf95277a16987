use cosmwasm_std::{DepsMut, Env, MessageInfo, Response};
use daypot_common::validate_admin_share;

use crate::error::ContractError;
use crate::msg::UpdateConfigParams;
use crate::state::{CONFIG, DAY_SECONDS};

pub const MIN_REREQUEST_DELAY_SECONDS: u64 = 60;
pub const MAX_REREQUEST_DELAY_SECONDS: u64 = 7 * DAY_SECONDS;

pub fn validate_cooldown(cooldown_seconds: u64) -> Result<(), ContractError> {
    if cooldown_seconds >= DAY_SECONDS {
        return Err(ContractError::InvalidConfig {
            reason: format!(
                "cooldown_seconds {} must be shorter than a day",
                cooldown_seconds
            ),
        });
    }
    Ok(())
}

pub fn validate_rerequest_delay(delay_seconds: u64) -> Result<(), ContractError> {
    if !(MIN_REREQUEST_DELAY_SECONDS..=MAX_REREQUEST_DELAY_SECONDS).contains(&delay_seconds) {
        return Err(ContractError::InvalidConfig {
            reason: format!(
                "rerequest_delay_seconds {} out of range {}..={}",
                delay_seconds, MIN_REREQUEST_DELAY_SECONDS, MAX_REREQUEST_DELAY_SECONDS
            ),
        });
    }
    Ok(())
}

/// Reassign the payout recipients. Manager only.
pub fn update_recipients(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    project: Option<String>,
    admin: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.manager {
        return Err(ContractError::Unauthorized {
            reason: "only manager can update recipients".to_string(),
        });
    }

    if let Some(project) = project {
        config.project = deps.api.addr_validate(&project)?;
    }
    if let Some(admin) = admin {
        config.admin = deps.api.addr_validate(&admin)?;
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_recipients")
        .add_attribute("project", config.project.to_string())
        .add_attribute("admin", config.admin.to_string()))
}

/// Hand the manager role over. Manager only.
pub fn set_manager(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    manager: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.manager {
        return Err(ContractError::Unauthorized {
            reason: "only manager can set a new manager".to_string(),
        });
    }

    config.manager = deps.api.addr_validate(&manager)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_manager")
        .add_attribute("manager", config.manager.to_string()))
}

/// Update runtime parameters. Owner only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let UpdateConfigParams {
        admin_share_pct,
        cooldown_seconds,
        rerequest_delay_seconds,
        randomness_oracle,
    } = params;

    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {
            reason: "only owner can update config".to_string(),
        });
    }

    if let Some(pct) = admin_share_pct {
        validate_admin_share(pct)?;
        config.admin_share_pct = pct;
    }
    if let Some(cooldown) = cooldown_seconds {
        validate_cooldown(cooldown)?;
        config.cooldown_seconds = cooldown;
    }
    if let Some(delay) = rerequest_delay_seconds {
        validate_rerequest_delay(delay)?;
        config.rerequest_delay_seconds = delay;
    }
    if let Some(oracle) = randomness_oracle {
        config.randomness_oracle = deps.api.addr_validate(&oracle)?;
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "update_config"))
}
