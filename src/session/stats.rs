//! Per-user message counts, maintained incrementally alongside the log.

use crate::session::Message;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Username to message count. Iteration order is first-insertion order,
/// which also breaks ties in [`StatsAggregate::ranked_entries`].
#[derive(Debug, Clone, Default)]
pub struct StatsAggregate {
    entries: Vec<(String, u32)>,
    index: HashMap<String, usize>,
}

impl StatsAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild counts from a log. Messages authored by `exclude` are skipped.
    pub fn from_log(messages: &[Message], exclude: Option<&str>) -> Self {
        let mut stats = Self::new();
        for message in messages {
            if exclude == Some(message.username.as_str()) {
                continue;
            }
            stats.record(&message.username);
        }
        stats
    }

    pub fn record(&mut self, username: &str) {
        match self.index.get(username) {
            Some(&slot) => {
                let count = &mut self.entries[slot].1;
                *count = count.saturating_add(1);
            }
            None => {
                self.index.insert(username.to_string(), self.entries.len());
                self.entries.push((username.to_string(), 1));
            }
        }
    }

    fn set(&mut self, username: String, count: u32) {
        match self.index.get(&username) {
            Some(&slot) => self.entries[slot].1 = count,
            None => {
                self.index.insert(username.clone(), self.entries.len());
                self.entries.push((username, count));
            }
        }
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn count(&self, username: &str) -> u32 {
        self.index
            .get(username)
            .map_or(0, |&slot| self.entries[slot].1)
    }

    /// Distinct users with at least one recorded entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| u64::from(*count)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Entries by descending count; equal counts keep insertion order.
    pub fn ranked_entries(&self) -> Vec<(String, u32)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Equality ignores insertion order: two aggregates are equal when they map
/// the same users to the same counts.
impl PartialEq for StatsAggregate {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(name, count)| {
                other
                    .index
                    .get(name)
                    .is_some_and(|&slot| other.entries[slot].1 == count)
            })
    }
}

impl Eq for StatsAggregate {}

impl Serialize for StatsAggregate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StatsAggregate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AggregateVisitor;

        impl<'de> Visitor<'de> for AggregateVisitor {
            type Value = StatsAggregate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of username to non-negative message count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut stats = StatsAggregate::new();
                while let Some((name, count)) = access.next_entry::<String, u32>()? {
                    stats.set(name, count);
                }
                Ok(stats)
            }
        }

        deserializer.deserialize_map(AggregateVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn message(username: &str) -> Message {
        Message {
            username: username.to_string(),
            text: "hi".to_string(),
            timestamp: "12:00:00".to_string(),
        }
    }

    fn aggregate(pairs: &[(&str, u32)]) -> StatsAggregate {
        let mut stats = StatsAggregate::new();
        for (name, count) in pairs {
            stats.set((*name).to_string(), *count);
        }
        stats
    }

    #[test]
    fn record_inserts_then_increments() {
        let mut stats = StatsAggregate::new();
        stats.record("Alice");
        stats.record("Bob");
        stats.record("Alice");

        assert_eq!(stats.count("Alice"), 2);
        assert_eq!(stats.count("Bob"), 1);
        assert_eq!(stats.count("Carol"), 0);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats.total(), 3);
    }

    #[test]
    fn reset_clears_everything() {
        let mut stats = aggregate(&[("Alice", 3)]);
        stats.reset();
        assert!(stats.is_empty());
        assert_eq!(stats.count("Alice"), 0);
        stats.record("Alice");
        assert_eq!(stats.count("Alice"), 1);
    }

    #[test]
    fn ranking_is_descending_with_stable_ties() {
        let stats = aggregate(&[("Alice", 3), ("Bob", 5), ("Carol", 5)]);
        let expected = vec![
            ("Bob".to_string(), 5),
            ("Carol".to_string(), 5),
            ("Alice".to_string(), 3),
        ];
        assert_eq!(stats.ranked_entries(), expected);
        assert_eq!(stats.ranked_entries(), expected);
    }

    #[test]
    fn ranking_of_empty_aggregate_is_empty() {
        assert!(StatsAggregate::new().ranked_entries().is_empty());
    }

    #[test]
    fn from_log_skips_excluded_author() {
        let log = [message("System"), message("Alice"), message("Bob"), message("Alice")];
        let stats = StatsAggregate::from_log(&log, Some("System"));
        assert_eq!(stats.count("System"), 0);
        assert_eq!(stats.count("Alice"), 2);
        let names: Vec<&str> = stats.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Alice", "Bob"]);

        let counted = StatsAggregate::from_log(&log, None);
        assert_eq!(counted.count("System"), 1);
    }

    #[test]
    fn serializes_as_map_in_insertion_order() {
        let stats = aggregate(&[("Zed", 1), ("Amy", 2)]);
        let json = serde_json::to_string(&stats).expect("aggregate should serialize");
        assert_eq!(json, r#"{"Zed":1,"Amy":2}"#);

        let decoded: StatsAggregate = serde_json::from_str(&json).expect("aggregate should parse");
        let names: Vec<&str> = decoded.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Zed", "Amy"]);
    }

    #[test]
    fn rejects_negative_counts() {
        let parsed = serde_json::from_str::<StatsAggregate>(r#"{"Alice":-1}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn equality_ignores_order() {
        assert_eq!(aggregate(&[("A", 1), ("B", 2)]), aggregate(&[("B", 2), ("A", 1)]));
        assert_ne!(aggregate(&[("A", 1)]), aggregate(&[("A", 1), ("B", 0)]));
    }

    proptest! {
        #[test]
        fn incremental_counts_match_rebuild(names in prop::collection::vec("[a-d]{0,2}", 0..64)) {
            let mut stats = StatsAggregate::new();
            let log: Vec<Message> = names.iter().map(|name| message(name)).collect();
            for entry in &log {
                stats.record(&entry.username);
            }
            prop_assert_eq!(&stats, &StatsAggregate::from_log(&log, None));
            for (name, count) in stats.iter() {
                let expected = log.iter().filter(|m| m.username == name).count();
                prop_assert_eq!(count as usize, expected);
            }
        }

        #[test]
        fn ranking_never_increases(counts in prop::collection::vec(0u32..20, 0..32)) {
            let mut stats = StatsAggregate::new();
            for (i, count) in counts.iter().enumerate() {
                stats.set(format!("user{i}"), *count);
            }
            let ranked = stats.ranked_entries();
            prop_assert_eq!(ranked.len(), counts.len());
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].1 >= pair[1].1);
            }
        }
    }
}
