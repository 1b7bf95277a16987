use cosmwasm_std::Timestamp;

/// True once at least `delay_seconds` have passed since `since`.
///
/// Delay bookkeeping (what was scheduled and when) belongs to the caller;
/// this only answers whether the wait is over.
pub fn delay_elapsed(since: Timestamp, delay_seconds: u64, now: Timestamp) -> bool {
    match since.seconds().checked_add(delay_seconds) {
        Some(ready_at) => now.seconds() >= ready_at,
        None => false,
    }
}
