//! Running frequency counts over query records

use crate::record::QueryRecord;
use std::collections::HashMap;

/// Per-key count table. Ties rank by first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, Counter>,
}

#[derive(Debug, Clone, Copy)]
struct Counter {
    count: u64,
    first_seen: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: &str) {
        let next_index = self.counts.len() as u64;

        if let Some(counter) = self.counts.get_mut(key) {
            counter.count += 1;
            return;
        }

        self.counts.insert(
            key.to_string(),
            Counter {
                count: 1,
                first_seen: next_index,
            },
        );
    }

    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).map_or(0, |c| c.count)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Up to `n` keys by descending count
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&String, &Counter)> = self.counts.iter().collect();
        entries.sort_by(|(_, a), (_, b)| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.first_seen.cmp(&b.first_seen))
        });

        entries
            .into_iter()
            .take(n)
            .map(|(key, counter)| (key.as_str(), counter.count))
            .collect()
    }
}

/// Aggregate counters for one run
#[derive(Debug, Clone, Default)]
pub struct QueryStats {
    total_records: u64,
    client_ips: FrequencyTable,
    names: FrequencyTable,
}

impl QueryStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one record
    pub fn record(&mut self, record: &QueryRecord) {
        self.total_records += 1;
        self.client_ips.increment(&record.client_ip);
        self.names.increment(&record.name);
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn client_ips(&self) -> &FrequencyTable {
        &self.client_ips
    }

    pub fn names(&self) -> &FrequencyTable {
        &self.names
    }
}
