use cosmwasm_std::Uint256;

/// Reduce a 256-bit random value to a ticket index in `[0, total_tickets)`.
///
/// Returns `None` when there are no tickets to draw from.
pub fn winning_ticket(random_value: Uint256, total_tickets: u64) -> Option<u64> {
    if total_tickets == 0 {
        return None;
    }
    let rem = random_value % Uint256::from(total_tickets);
    // rem < total_tickets, so only the low 8 bytes can be set
    let bytes = rem.to_be_bytes();
    let mut low = [0u8; 8];
    low.copy_from_slice(&bytes[24..32]);
    Some(u64::from_be_bytes(low))
}

/// Ticket-weighted winner selection over a list of distinct participants.
///
/// Participant `i` owns the half-open range
/// `[cumulative_before_i, cumulative_before_i + weight_i)` of the ticket space.
/// The winning ticket is `random_value mod total_tickets`; the owner of the
/// range containing it wins. Zero-weight entries own an empty range and can
/// never be selected.
///
/// `total_tickets` must equal the sum of the weights. Returns `None` if the
/// population is empty or the weights do not cover the winning ticket.
pub fn pick_winner<T, I>(random_value: Uint256, total_tickets: u64, participants: I) -> Option<T>
where
    I: IntoIterator<Item = (T, u64)>,
{
    let ticket = winning_ticket(random_value, total_tickets)?;

    let mut cumulative: u64 = 0;
    for (participant, weight) in participants {
        let end = cumulative.checked_add(weight)?;
        if ticket < end {
            return Some(participant);
        }
        cumulative = end;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    fn population() -> Vec<(&'static str, u64)> {
        vec![("alice", 10), ("bob", 30), ("carol", 60)]
    }

    #[test]
    fn test_winning_ticket_reduces_modulo_total() {
        assert_eq!(winning_ticket(Uint256::from(0u64), 100), Some(0));
        assert_eq!(winning_ticket(Uint256::from(99u64), 100), Some(99));
        assert_eq!(winning_ticket(Uint256::from(100u64), 100), Some(0));
        // 2^256 - 1 = 15 (mod 26)
        assert_eq!(winning_ticket(Uint256::MAX, 26), Some(15));
        assert_eq!(winning_ticket(Uint256::from(5u64), 0), None);
    }

    #[test]
    fn test_range_boundaries() {
        let pick = |r: u64| pick_winner(Uint256::from(r), 100, population()).unwrap();
        assert_eq!(pick(0), "alice");
        assert_eq!(pick(9), "alice");
        assert_eq!(pick(10), "bob");
        assert_eq!(pick(39), "bob");
        assert_eq!(pick(40), "carol");
        assert_eq!(pick(99), "carol");
        assert_eq!(pick(140), "carol");
    }

    #[test]
    fn test_zero_weight_never_selected() {
        let entries = vec![("ghost", 0), ("alice", 1), ("empty", 0), ("bob", 1)];
        for r in 0..50u64 {
            let winner = pick_winner(Uint256::from(r), 2, entries.clone()).unwrap();
            assert!(winner == "alice" || winner == "bob");
        }
    }

    #[test]
    fn test_empty_population() {
        let entries: Vec<(&str, u64)> = vec![];
        assert_eq!(pick_winner(Uint256::from(3u64), 0, entries), None);
    }

    #[test]
    fn test_weights_short_of_total() {
        // Declared total larger than the sum of the weights
        assert_eq!(pick_winner(Uint256::from(150u64), 200, population()), None);
    }

    #[test]
    fn test_exact_proportions_over_full_cycle() {
        let mut counts = [0u32; 3];
        for r in 0..10_000u64 {
            match pick_winner(Uint256::from(r), 100, population()).unwrap() {
                "alice" => counts[0] += 1,
                "bob" => counts[1] += 1,
                _ => counts[2] += 1,
            }
        }
        assert_eq!(counts, [1_000, 3_000, 6_000]);
    }

    #[test]
    fn test_weighted_fairness_with_hashed_randomness() {
        let mut counts = [0u32; 3];
        let rounds = 20_000u32;
        for i in 0..rounds {
            let digest: [u8; 32] = Sha256::digest(i.to_be_bytes()).into();
            let random = Uint256::from_be_bytes(digest);
            match pick_winner(random, 100, population()).unwrap() {
                "alice" => counts[0] += 1,
                "bob" => counts[1] += 1,
                _ => counts[2] += 1,
            }
        }
        let share = |c: u32| f64::from(c) / f64::from(rounds);
        // 20k samples: three-sigma is under 1.1% for each bucket
        assert!((share(counts[0]) - 0.10).abs() < 0.015, "{:?}", counts);
        assert!((share(counts[1]) - 0.30).abs() < 0.015, "{:?}", counts);
        assert!((share(counts[2]) - 0.60).abs() < 0.015, "{:?}", counts);
    }
}
