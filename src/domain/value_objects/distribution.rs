//! Sum distribution types for two six-sided dice.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Smallest possible two-die sum
pub const MIN_SUM: u8 = 2;
/// Largest possible two-die sum
pub const MAX_SUM: u8 = 12;
/// Number of distinct sums (2..=12)
pub const SUM_COUNT: usize = (MAX_SUM - MIN_SUM + 1) as usize;
/// Equally likely outcomes of two dice
pub const OUTCOMES: u32 = 36;

/// Outcomes (out of 36) producing each sum, indexed by `sum - 2`
pub const SUM_WAYS: [u32; SUM_COUNT] = [1, 2, 3, 4, 5, 6, 5, 4, 3, 2, 1];

/// Exact probability of a sum on two fair dice, zero outside 2..=12
pub fn sum_probability(sum: u8) -> f64 {
    sum_ways(sum).map_or(0.0, |ways| f64::from(ways) / f64::from(OUTCOMES))
}

pub(crate) fn sum_ways(sum: u8) -> Option<u32> {
    bucket_index(sum).map(|i| SUM_WAYS[i])
}

fn bucket_index(sum: u8) -> Option<usize> {
    (MIN_SUM..=MAX_SUM)
        .contains(&sum)
        .then(|| (sum - MIN_SUM) as usize)
}

/// Count per sum. All eleven sums are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SumHistogram {
    counts: [u32; SUM_COUNT],
}

impl SumHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `sum`. Sums outside 2..=12 are ignored.
    pub fn record(&mut self, sum: u8) -> bool {
        match bucket_index(sum) {
            Some(i) => {
                self.counts[i] += 1;
                true
            }
            None => false,
        }
    }

    /// Set the count for `sum`. Sums outside 2..=12 are ignored.
    pub fn set(&mut self, sum: u8, count: u32) {
        if let Some(i) = bucket_index(sum) {
            self.counts[i] = count;
        }
    }

    pub fn get(&self, sum: u8) -> u32 {
        bucket_index(sum).map_or(0, |i| self.counts[i])
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// `(sum, count)` pairs in ascending sum order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        (MIN_SUM..=MAX_SUM).zip(self.counts.iter().copied())
    }
}

impl Serialize for SumHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SUM_COUNT))?;
        for (sum, count) in self.iter() {
            map.serialize_entry(&sum, &count)?;
        }
        map.end()
    }
}

/// Sign of the difference between actual and expected counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Deviation {
    Even,
    Above,
    Below,
}

impl Deviation {
    pub fn from_delta(delta: i64) -> Self {
        match delta.signum() {
            0 => Deviation::Even,
            1 => Deviation::Above,
            _ => Deviation::Below,
        }
    }
}

/// Actual vs expected count for one sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SumComparison {
    pub sum: u8,
    pub actual_count: u32,
    pub expected_count: u32,
    pub delta: i64,
    pub deviation: Deviation,
}

impl SumComparison {
    pub fn new(sum: u8, actual_count: u32, expected_count: u32) -> Self {
        let delta = i64::from(actual_count) - i64::from(expected_count);
        Self {
            sum,
            actual_count,
            expected_count,
            delta,
            deviation: Deviation::from_delta(delta),
        }
    }
}

/// Distribution of a (possibly filtered) roll sequence
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub player_filter: Option<usize>,
    pub total_count: u32,
    pub actual: SumHistogram,
    pub expected: SumHistogram,
    pub comparisons: Vec<SumComparison>,
}
