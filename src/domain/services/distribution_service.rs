//! Distribution aggregator.
//!
//! Pure functions over a roll snapshot. Callers recompute from scratch on
//! every new snapshot; nothing here keeps state between calls.

use crate::domain::entities::Roll;
use crate::domain::value_objects::{
    Distribution, SumComparison, SumHistogram, MAX_SUM, MIN_SUM, OUTCOMES, SUM_WAYS,
};

/// Count rolls per sum, optionally only those of one player
pub fn histogram(rolls: &[Roll], player_filter: Option<usize>) -> SumHistogram {
    let mut histogram = SumHistogram::new();
    for roll in rolls
        .iter()
        .filter(|roll| player_filter.map_or(true, |p| roll.player_index == p))
    {
        histogram.record(roll.sum);
    }
    histogram
}

/// Expected count per sum for `total` rolls of two fair dice,
/// rounded half up.
pub fn expected(total: u32) -> SumHistogram {
    let mut expected = SumHistogram::new();
    for (sum, ways) in (MIN_SUM..=MAX_SUM).zip(SUM_WAYS) {
        // floor(total * ways / 36 + 1/2), in integers
        let doubled = 2 * u64::from(total) * u64::from(ways) + u64::from(OUTCOMES);
        let rounded = doubled / (2 * u64::from(OUTCOMES));
        expected.set(sum, u32::try_from(rounded).unwrap_or(u32::MAX));
    }
    expected
}

/// Per-sum comparison of two histograms, ascending by sum
pub fn compare(actual: &SumHistogram, expected: &SumHistogram) -> Vec<SumComparison> {
    actual
        .iter()
        .map(|(sum, count)| SumComparison::new(sum, count, expected.get(sum)))
        .collect()
}

/// Full actual vs expected view of a roll snapshot.
///
/// Expected counts are scaled to the filtered total.
pub fn distribution(rolls: &[Roll], player_filter: Option<usize>) -> Distribution {
    let actual = histogram(rolls, player_filter);
    let total_count = actual.total();
    let expected = expected(total_count);
    let comparisons = compare(&actual, &expected);

    Distribution {
        player_filter,
        total_count,
        actual,
        expected,
        comparisons,
    }
}

/// Number of rolls per seat
pub fn roll_counts(rolls: &[Roll], player_count: usize) -> Vec<u32> {
    let mut counts = vec![0u32; player_count];
    for roll in rolls {
        if let Some(count) = counts.get_mut(roll.player_index) {
            *count += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{sum_probability, Deviation};

    #[test]
    fn test_probabilities_sum_to_one() {
        let total: f64 = (MIN_SUM..=MAX_SUM).map(sum_probability).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(sum_probability(7), 6.0 / 36.0);
        assert_eq!(sum_probability(1), 0.0);
    }

    fn roll(seq: u64, player_index: usize, die1: u8, die2: u8) -> Roll {
        Roll {
            id: format!("r{seq}"),
            game_id: "g1".into(),
            player_index,
            die1,
            die2,
            sum: die1 + die2,
            sequence: seq,
            timestamp: seq as i64,
        }
    }

    fn sample_rolls() -> Vec<Roll> {
        let mut rolls = Vec::new();
        let mut seq = 0;
        for die1 in 1..=6u8 {
            for die2 in 1..=6u8 {
                rolls.push(roll(seq, (seq % 3) as usize, die1, die2));
                seq += 1;
            }
        }
        rolls
    }

    #[test]
    fn test_every_roll_counted_once() {
        let rolls = sample_rolls();
        let all = histogram(&rolls, None);
        assert_eq!(all.total() as usize, rolls.len());

        let per_player: u32 = (0..3).map(|p| histogram(&rolls, Some(p)).total()).sum();
        assert_eq!(per_player as usize, rolls.len());
    }

    #[test]
    fn test_all_sums_present() {
        let histogram = histogram(&[], None);
        assert_eq!(histogram.iter().count(), 11);
        assert!(histogram.iter().all(|(_, count)| count == 0));
    }

    #[test]
    fn test_expected_for_36_is_canonical() {
        let expected = expected(36);
        let canonical = [
            (2, 1),
            (3, 2),
            (4, 3),
            (5, 4),
            (6, 5),
            (7, 6),
            (8, 5),
            (9, 4),
            (10, 3),
            (11, 2),
            (12, 1),
        ];
        for (sum, count) in canonical {
            assert_eq!(expected.get(sum), count, "sum {sum}");
        }
    }

    #[test]
    fn test_expected_rounds_half_up() {
        // 18 rolls: sum 2 expects exactly 0.5
        assert_eq!(expected(18).get(2), 1);
        // 1 roll: sum 7 expects 1/6
        assert_eq!(expected(1).get(7), 0);
        // 3 rolls: sum 7 expects exactly 0.5
        assert_eq!(expected(3).get(7), 1);
    }

    #[test]
    fn test_expected_matches_real_valued_rounding() {
        for total in 0..500u32 {
            let expected = expected(total);
            for (sum, ways) in (MIN_SUM..=MAX_SUM).zip(SUM_WAYS) {
                let exact = f64::from(total * ways) / f64::from(OUTCOMES);
                assert_eq!(f64::from(expected.get(sum)), (exact + 0.5).floor(), "{total}/{sum}");
            }
        }
    }

    #[test]
    fn test_single_seven_scenario() {
        let rolls = vec![roll(1, 0, 3, 4)];
        let view = distribution(&rolls, None);

        assert_eq!(view.total_count, 1);
        assert_eq!(view.actual.get(7), 1);
        assert_eq!(view.expected.get(7), 0);

        let seven = view.comparisons.iter().find(|c| c.sum == 7).unwrap();
        assert_eq!(seven.delta, 1);
        assert_eq!(seven.deviation, Deviation::Above);
        assert!(view
            .comparisons
            .iter()
            .filter(|c| c.sum != 7)
            .all(|c| c.delta == 0 && c.deviation == Deviation::Even));
    }

    #[test]
    fn test_filter_scales_expected_to_filtered_total() {
        let rolls = sample_rolls();
        let view = distribution(&rolls, Some(0));
        assert_eq!(view.player_filter, Some(0));
        assert_eq!(view.total_count, 12);
        assert_eq!(view.expected, expected(12));
    }

    #[test]
    fn test_out_of_range_sums_ignored() {
        let mut bogus = roll(1, 0, 6, 6);
        bogus.sum = 13;
        assert_eq!(histogram(&[bogus], None).total(), 0);
    }

    #[test]
    fn test_roll_counts_per_seat() {
        let rolls = sample_rolls();
        assert_eq!(roll_counts(&rolls, 3), vec![12, 12, 12]);
        assert_eq!(roll_counts(&rolls[..4], 2), vec![2, 1]);
    }
}
