use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;
use thiserror::Error;

/// Fixed share of every pot credited to the project beneficiary.
pub const PROJECT_SHARE_PCT: u8 = 50;

#[derive(Error, Debug, PartialEq)]
pub enum SplitError {
    #[error("admin share {pct}% out of range (1..={max})")]
    InvalidAdminShare { pct: u8, max: u8 },
}

/// Three-way division of a settled pot.
#[cw_serde]
pub struct PotSplit {
    pub project: Uint128,
    pub admin: Uint128,
    pub winner: Uint128,
}

/// Check an admin share against the fixed project share: `0 < pct` and
/// `pct + PROJECT_SHARE_PCT <= 100`.
pub fn validate_admin_share(pct: u8) -> Result<(), SplitError> {
    let max = 100 - PROJECT_SHARE_PCT;
    if pct == 0 || pct > max {
        return Err(SplitError::InvalidAdminShare { pct, max });
    }
    Ok(())
}

/// Split `pot` into project, admin and winner amounts.
///
/// Project and admin amounts are floored percentages of the pot. The winner
/// takes the remainder, so the three parts always sum to exactly `pot`.
pub fn split_pot(pot: Uint128, admin_share_pct: u8) -> Result<PotSplit, SplitError> {
    validate_admin_share(admin_share_pct)?;

    let project = pot.multiply_ratio(PROJECT_SHARE_PCT, 100u128);
    let admin = pot.multiply_ratio(admin_share_pct, 100u128);
    // project + admin <= pot because the shares sum to at most 100%
    let winner = pot - project - admin;

    Ok(PotSplit {
        project,
        admin,
        winner,
    })
}
