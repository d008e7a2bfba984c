//! Per-bead usage counting.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

/// Thread-safe counter of how often each bead was chosen.
#[derive(Debug, Default)]
pub struct UsageAccumulator {
    counts: Mutex<HashMap<String, u64>>,
}

impl UsageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one use of `bead`.
    pub fn record(&self, bead: &str) {
        self.record_many(bead, 1);
    }

    /// Count `count` uses of `bead`.
    pub fn record_many(&self, bead: &str, count: u64) {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        match counts.get_mut(bead) {
            Some(total) => *total += count,
            None => {
                counts.insert(bead.to_string(), count);
            }
        }
    }

    /// Merge a locally collected tally under a single lock acquisition.
    pub fn record_tally<'a>(&self, tally: impl IntoIterator<Item = (&'a str, u64)>) {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        for (bead, count) in tally {
            *counts.entry(bead.to_string()).or_default() += count;
        }
    }

    /// Current per-bead counts.
    pub fn snapshot(&self) -> UsageCounts {
        let counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        UsageCounts(counts.iter().map(|(k, &v)| (k.clone(), v)).collect())
    }
}

/// Final bead usage of a run, ordered by bead name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UsageCounts(BTreeMap<String, u64>);

impl UsageCounts {
    /// Count for one bead; zero if it was never chosen.
    pub fn get(&self, bead: &str) -> u64 {
        self.0.get(bead).copied().unwrap_or(0)
    }

    /// Number of distinct beads used.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum over all beads; equals the pixel count of a completed run.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, u64)> for UsageCounts {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        let mut counts = BTreeMap::new();
        for (bead, count) in iter {
            *counts.entry(bead).or_default() += count;
        }
        Self(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_and_snapshot() {
        let usage = UsageAccumulator::new();
        usage.record("red");
        usage.record("red");
        usage.record_many("blue", 3);

        let counts = usage.snapshot();
        assert_eq!(counts.get("red"), 2);
        assert_eq!(counts.get("blue"), 3);
        assert_eq!(counts.get("green"), 0);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn test_snapshot_sorted_by_name() {
        let usage = UsageAccumulator::new();
        usage.record_tally([("zeta", 1), ("alpha", 2), ("zeta", 4)]);

        let snapshot = usage.snapshot();
        let counts: Vec<(&str, u64)> = snapshot.iter().collect();
        assert_eq!(counts, vec![("alpha", 2), ("zeta", 5)]);
    }

    #[test]
    fn test_concurrent_recording() {
        let usage = UsageAccumulator::new();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..1000 {
                        usage.record("bead");
                    }
                });
            }
        });
        assert_eq!(usage.snapshot().get("bead"), 8000);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let counts: UsageCounts = [("red".to_string(), 1), ("blue".to_string(), 2)]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"blue":2,"red":1}"#);
    }
}
