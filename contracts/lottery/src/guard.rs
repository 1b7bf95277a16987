use cosmwasm_std::Storage;

use crate::error::ContractError;
use crate::state::{InFlightTransfer, TRANSFER_LOCK};

/// Reply id of the withdrawal transfer; its reply releases the lock.
pub const TRANSFER_REPLY_ID: u64 = 1;

/// Reject any entry while an outgoing transfer has not been acknowledged.
pub fn ensure_unlocked(storage: &dyn Storage) -> Result<(), ContractError> {
    if TRANSFER_LOCK.exists(storage) {
        return Err(ContractError::ReentrantCall);
    }
    Ok(())
}

/// Take the lock for `transfer`. Held until the transfer reply calls `release`.
pub fn acquire(storage: &mut dyn Storage, transfer: &InFlightTransfer) -> Result<(), ContractError> {
    ensure_unlocked(storage)?;
    TRANSFER_LOCK.save(storage, transfer)?;
    Ok(())
}

/// Drop the lock, handing back the transfer it was held for.
pub fn release(storage: &mut dyn Storage) -> Result<Option<InFlightTransfer>, ContractError> {
    let transfer = TRANSFER_LOCK.may_load(storage)?;
    TRANSFER_LOCK.remove(storage);
    Ok(transfer)
}
