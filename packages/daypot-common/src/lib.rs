pub mod selection;
pub mod split;
pub mod timelock;
pub mod types;

pub use selection::{pick_winner, winning_ticket};
pub use split::{split_pot, validate_admin_share, PotSplit, SplitError, PROJECT_SHARE_PCT};
pub use timelock::delay_elapsed;
pub use types::{DrawStatus, DrawTarget};
