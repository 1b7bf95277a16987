use std::fmt;

use cosmwasm_schema::cw_serde;

/// What a draw is run for: a day bucket of the daily lottery or a prize pool.
/// Carried through every randomness request so the callback never has to
/// guess the target kind from the numeric id.
#[cw_serde]
#[derive(Copy, Eq, Hash)]
pub enum DrawTarget {
    Day(u64),
    Pool(u64),
}

impl DrawTarget {
    /// Tag sent along with a randomness request, e.g. `day:19000`.
    pub fn trace_tag(&self) -> String {
        self.to_string().replace(' ', ":")
    }
}

impl fmt::Display for DrawTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawTarget::Day(day) => write!(f, "day {}", day),
            DrawTarget::Pool(id) => write!(f, "pool {}", id),
        }
    }
}

/// Lifecycle of a draw target. Transitions only move forward:
/// `Open -> DrawRequested -> Settled`.
#[cw_serde]
#[derive(Copy, Eq, Default)]
pub enum DrawStatus {
    #[default]
    Open,
    DrawRequested,
    Settled,
}

impl DrawStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawStatus::Open => "open",
            DrawStatus::DrawRequested => "draw_requested",
            DrawStatus::Settled => "settled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_tag() {
        assert_eq!(DrawTarget::Day(19_000).trace_tag(), "day:19000");
        assert_eq!(DrawTarget::Pool(1_000_001).trace_tag(), "pool:1000001");
    }

    #[test]
    fn test_targets_with_same_id_differ() {
        assert_ne!(DrawTarget::Day(7), DrawTarget::Pool(7));
    }
}
