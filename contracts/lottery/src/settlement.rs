use cosmwasm_std::{
    coins, Addr, BankMsg, DepsMut, Env, Event, MessageInfo, Reply, Response, Storage, SubMsg,
    SubMsgResult, Uint128,
};
use daypot_common::{split_pot, DrawStatus, DrawTarget, PotSplit};

use crate::error::ContractError;
use crate::guard::{self, TRANSFER_REPLY_ID};
use crate::state::{
    update_ledger, InFlightTransfer, CONFIG, DAY_POTS, PENDING_PAYMENTS, POOLS,
};

/// Outcome of a settled draw: who was credited what.
pub struct Settlement {
    pub target: DrawTarget,
    pub project: Addr,
    pub admin: Addr,
    pub winner: Addr,
    pub split: PotSplit,
}

impl Settlement {
    pub fn credit_events(&self) -> Vec<Event> {
        [
            ("project", &self.project, self.split.project),
            ("admin", &self.admin, self.split.admin),
            ("winner", &self.winner, self.split.winner),
        ]
        .into_iter()
        .map(|(role, recipient, amount)| {
            Event::new("daypot_payment_credited")
                .add_attribute("target", self.target.trace_tag())
                .add_attribute("role", role)
                .add_attribute("recipient", recipient.to_string())
                .add_attribute("amount", amount.to_string())
        })
        .collect()
    }
}

fn ensure_recipient(recipient: &Addr, contract: &Addr, role: &str) -> Result<(), ContractError> {
    if recipient.as_str().is_empty() {
        return Err(ContractError::InvalidAddress {
            reason: format!("{} recipient is empty", role),
        });
    }
    if recipient == contract {
        return Err(ContractError::InvalidAddress {
            reason: format!("{} recipient is the lottery itself", role),
        });
    }
    Ok(())
}

/// Add `amount` to a recipient's pull-payment balance.
pub fn credit(
    storage: &mut dyn Storage,
    recipient: &Addr,
    amount: Uint128,
) -> Result<Uint128, ContractError> {
    PENDING_PAYMENTS.update(storage, recipient, |balance| -> Result<_, ContractError> {
        Ok(balance.unwrap_or_default().checked_add(amount)?)
    })
}

/// Mark the target settled and empty its balance. `pot_amount` must be the
/// whole live balance.
fn close_source(
    storage: &mut dyn Storage,
    target: DrawTarget,
    winner: &Addr,
    pot_amount: Uint128,
) -> Result<(), ContractError> {
    match target {
        DrawTarget::Day(day) => {
            let mut pot = DAY_POTS.load(storage, day)?;
            if pot.amount != pot_amount {
                return Err(ContractError::PotMismatch { target });
            }
            pot.amount = Uint128::zero();
            pot.draw.status = DrawStatus::Settled;
            pot.draw.winner = Some(winner.clone());
            pot.draw.settled_amount = pot_amount;
            DAY_POTS.save(storage, day, &pot)?;
            update_ledger(storage, |totals| {
                totals.live_day_pots = totals.live_day_pots.checked_sub(pot_amount)?;
                totals.pending_payments = totals.pending_payments.checked_add(pot_amount)?;
                Ok(())
            })?;
        }
        DrawTarget::Pool(pool_id) => {
            let mut pool = POOLS.load(storage, pool_id)?;
            if pool.balance != pot_amount {
                return Err(ContractError::PotMismatch { target });
            }
            pool.balance = Uint128::zero();
            pool.draw.status = DrawStatus::Settled;
            pool.draw.winner = Some(winner.clone());
            pool.draw.settled_amount = pot_amount;
            POOLS.save(storage, pool_id, &pool)?;
            update_ledger(storage, |totals| {
                totals.live_pool_balances = totals.live_pool_balances.checked_sub(pot_amount)?;
                totals.pending_payments = totals.pending_payments.checked_add(pot_amount)?;
                Ok(())
            })?;
        }
    }
    Ok(())
}

/// Split a drawn pot between project, admin and winner and credit all three.
///
/// The source balance is zeroed before anything is credited. A settlement
/// with an unusable recipient is rejected as a whole.
pub fn settle(
    storage: &mut dyn Storage,
    contract: &Addr,
    target: DrawTarget,
    winner: &Addr,
    pot_amount: Uint128,
) -> Result<Settlement, ContractError> {
    let config = CONFIG.load(storage)?;
    ensure_recipient(&config.project, contract, "project")?;
    ensure_recipient(&config.admin, contract, "admin")?;
    ensure_recipient(winner, contract, "winner")?;

    let split = split_pot(pot_amount, config.admin_share_pct)?;

    close_source(storage, target, winner, pot_amount)?;

    credit(storage, &config.project, split.project)?;
    credit(storage, &config.admin, split.admin)?;
    credit(storage, winner, split.winner)?;

    Ok(Settlement {
        target,
        project: config.project,
        admin: config.admin,
        winner: winner.clone(),
        split,
    })
}

/// Pay out the caller's pending balance.
///
/// The balance is cleared before the transfer is dispatched. The transfer runs
/// as a submessage under the transfer lock; its reply releases the lock.
pub fn withdraw(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let amount = PENDING_PAYMENTS
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    if amount.is_zero() {
        return Err(ContractError::NothingToWithdraw);
    }

    guard::acquire(
        deps.storage,
        &InFlightTransfer {
            recipient: info.sender.clone(),
            amount,
        },
    )?;

    PENDING_PAYMENTS.remove(deps.storage, &info.sender);
    update_ledger(deps.storage, |totals| {
        totals.pending_payments = totals.pending_payments.checked_sub(amount)?;
        Ok(())
    })?;

    let transfer = SubMsg::reply_always(
        BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: coins(amount.u128(), &config.denom),
        },
        TRANSFER_REPLY_ID,
    );

    Ok(Response::new()
        .add_submessage(transfer)
        .add_attribute("action", "withdraw")
        .add_attribute("recipient", info.sender.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("daypot_withdrawal")
                .add_attribute("recipient", info.sender.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("denom", config.denom),
        ))
}

/// Reply to the withdrawal transfer.
///
/// On failure the balance is put back and the error aborts the transaction,
/// so a failed payout never leaves the balance cleared.
pub fn handle_transfer_reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    let transfer = guard::release(deps.storage)?;

    match msg.result {
        SubMsgResult::Ok(_) => {
            let mut response = Response::new().add_attribute("action", "withdraw_confirmed");
            if let Some(transfer) = transfer {
                response = response
                    .add_attribute("recipient", transfer.recipient.to_string())
                    .add_attribute("amount", transfer.amount.to_string());
            }
            Ok(response)
        }
        SubMsgResult::Err(reason) => {
            if let Some(transfer) = transfer {
                credit(deps.storage, &transfer.recipient, transfer.amount)?;
                update_ledger(deps.storage, |totals| {
                    totals.pending_payments =
                        totals.pending_payments.checked_add(transfer.amount)?;
                    Ok(())
                })?;
            }
            Err(ContractError::TransferFailed { reason })
        }
    }
}
