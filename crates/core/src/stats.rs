//! Latency aggregation
//!
//! Reduces a sequence of [`BenchEntry`] values to an [`Aggregates`] snapshot.
//! Timing fields consider successful entries with a positive duration only;
//! failures are counted per kind. The snapshot is recomputed from scratch on
//! every call and the input is never mutated.

use serde::{Deserialize, Serialize};

use crate::outcome::{BenchEntry, ErrorKind};

/// Summary statistics for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    /// Number of retained entries (successes and failures)
    pub count: usize,
    pub median: u64,
    /// Nearest-rank 95th percentile
    pub p95: u64,
    pub min: u64,
    pub max: u64,
    pub timeout: usize,
    pub no_internet: usize,
    pub http4xx: usize,
    pub http5xx: usize,
    pub cancel: usize,
    pub unknown: usize,
}

impl Aggregates {
    /// Counter for one error kind
    pub fn errors_of(&self, kind: ErrorKind) -> usize {
        match kind {
            ErrorKind::Timeout => self.timeout,
            ErrorKind::NoInternet => self.no_internet,
            ErrorKind::Http4xx => self.http4xx,
            ErrorKind::Http5xx => self.http5xx,
            ErrorKind::Cancel => self.cancel,
            ErrorKind::Unknown => self.unknown,
        }
    }

    /// Sum of all six error counters
    pub fn errors(&self) -> usize {
        ErrorKind::ALL.iter().map(|kind| self.errors_of(*kind)).sum()
    }

    /// Entries that carried no error kind
    pub fn success_count(&self) -> usize {
        self.count - self.errors()
    }

    fn counter_mut(&mut self, kind: ErrorKind) -> &mut usize {
        match kind {
            ErrorKind::Timeout => &mut self.timeout,
            ErrorKind::NoInternet => &mut self.no_internet,
            ErrorKind::Http4xx => &mut self.http4xx,
            ErrorKind::Http5xx => &mut self.http5xx,
            ErrorKind::Cancel => &mut self.cancel,
            ErrorKind::Unknown => &mut self.unknown,
        }
    }
}

/// Reduce entries to summary statistics
pub fn aggregate(entries: &[BenchEntry]) -> Aggregates {
    let mut aggregates = Aggregates {
        count: entries.len(),
        ..Default::default()
    };

    for kind in entries.iter().filter_map(|entry| entry.kind) {
        *aggregates.counter_mut(kind) += 1;
    }

    let mut times: Vec<u64> = entries
        .iter()
        .filter(|entry| entry.is_success() && entry.duration_ms > 0)
        .map(|entry| entry.duration_ms)
        .collect();
    times.sort_unstable();

    if let (Some(&min), Some(&max)) = (times.first(), times.last()) {
        aggregates.median = median(&times);
        aggregates.p95 = percentile(&times, 0.95);
        aggregates.min = min;
        aggregates.max = max;
    }

    aggregates
}

/// Median of sorted, non-empty samples; even lengths average with integer truncation
fn median(sorted: &[u64]) -> u64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2
    }
}

/// Nearest-rank percentile over sorted, non-empty samples (p in 0.0..=1.0)
fn percentile(sorted: &[u64], p: f64) -> u64 {
    let last = sorted.len() - 1;
    let idx = ((p * last as f64).floor() as usize).min(last);
    sorted[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(ms: u64) -> BenchEntry {
        BenchEntry::success(ms, 200)
    }

    fn err(kind: ErrorKind) -> BenchEntry {
        BenchEntry::failure(kind, 1003, None)
    }

    #[test]
    fn test_empty_is_all_zero() {
        assert_eq!(aggregate(&[]), Aggregates::default());
    }

    #[test]
    fn test_even_length_median() {
        let agg = aggregate(&[ok(30), ok(10), ok(40), ok(20)]);
        assert_eq!(agg.count, 4);
        assert_eq!(agg.median, 25);
        assert_eq!(agg.min, 10);
        assert_eq!(agg.max, 40);
    }

    #[test]
    fn test_even_median_truncates() {
        // 10 + 21 = 31 -> 15, not 15.5
        let agg = aggregate(&[ok(10), ok(21)]);
        assert_eq!(agg.median, 15);
    }

    #[test]
    fn test_single_sample() {
        let agg = aggregate(&[ok(7)]);
        assert_eq!(
            (agg.median, agg.p95, agg.min, agg.max),
            (7, 7, 7, 7)
        );
    }

    #[test]
    fn test_p95_nearest_rank_over_twenty() {
        let entries: Vec<BenchEntry> = (1..=20).map(|i| ok(i * 10)).collect();
        let agg = aggregate(&entries);
        // floor(0.95 * 19) = 18 -> 19th smallest
        assert_eq!(agg.p95, 190);
        assert_eq!(agg.median, 105);
    }

    #[test]
    fn test_failures_counted_but_not_timed() {
        let entries = vec![
            ok(50),
            err(ErrorKind::Timeout),
            err(ErrorKind::Timeout),
            err(ErrorKind::Http5xx),
            err(ErrorKind::Cancel),
            ok(70),
        ];
        let agg = aggregate(&entries);

        assert_eq!(agg.count, 6);
        assert_eq!(agg.timeout, 2);
        assert_eq!(agg.http5xx, 1);
        assert_eq!(agg.cancel, 1);
        assert_eq!(agg.no_internet + agg.http4xx + agg.unknown, 0);
        assert_eq!(agg.max, 70);
        assert_eq!(agg.errors(), 4);
        assert_eq!(agg.success_count(), 2);
    }

    #[test]
    fn test_zero_duration_success_ignored_for_timing() {
        let agg = aggregate(&[ok(0), ok(12)]);
        assert_eq!(agg.count, 2);
        assert_eq!(agg.min, 12);
        assert_eq!(agg.median, 12);
    }

    #[test]
    fn test_all_failed_has_zero_timing() {
        let agg = aggregate(&[err(ErrorKind::NoInternet), err(ErrorKind::Unknown)]);
        assert_eq!(agg.count, 2);
        assert_eq!((agg.median, agg.p95, agg.min, agg.max), (0, 0, 0, 0));
        assert_eq!(agg.no_internet, 1);
        assert_eq!(agg.unknown, 1);
    }

    #[test]
    fn test_counter_invariant_and_idempotence() {
        let mut entries = Vec::new();
        for i in 0..50u64 {
            let kind = match i % 8 {
                0 => Some(ErrorKind::Timeout),
                1 => Some(ErrorKind::NoInternet),
                2 => Some(ErrorKind::Http4xx),
                3 => Some(ErrorKind::Http5xx),
                4 => Some(ErrorKind::Cancel),
                5 => Some(ErrorKind::Unknown),
                _ => None,
            };
            entries.push(BenchEntry {
                duration_ms: i * 3,
                status_code: None,
                kind,
            });

            let first = aggregate(&entries);
            let second = aggregate(&entries);
            assert_eq!(first, second);
            assert_eq!(first.count, entries.len());

            let successes = entries.iter().filter(|e| e.kind.is_none()).count();
            assert_eq!(first.errors() + successes, first.count);
        }
    }
}
