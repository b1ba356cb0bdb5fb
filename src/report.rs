//! Top-N ranking report printed at the end of a run

use crate::stats::{FrequencyTable, QueryStats};
use std::fmt;

pub const DEFAULT_TOP_N: usize = 5;

const RULE: &str = "---------------";

#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub key: String,
    pub count: u64,
    /// Share of all records, rounded to two decimals
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub total_records: u64,
    pub client_ips: Vec<RankEntry>,
    pub names: Vec<RankEntry>,
}

impl Report {
    pub fn from_stats(stats: &QueryStats, top_n: usize) -> Self {
        let total_records = stats.total_records();

        Self {
            total_records,
            client_ips: rank(stats.client_ips(), total_records, top_n),
            names: rank(stats.names(), total_records, top_n),
        }
    }
}

fn rank(table: &FrequencyTable, total_records: u64, top_n: usize) -> Vec<RankEntry> {
    if total_records == 0 {
        return Vec::new();
    }

    table
        .top(top_n)
        .into_iter()
        .map(|(key, count)| RankEntry {
            key: key.to_string(),
            count,
            percentage: percentage(count, total_records),
        })
        .collect()
}

fn percentage(count: u64, total: u64) -> f64 {
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total records: {}", self.total_records)?;
        writeln!(f)?;

        writeln!(f, "Client IPs Rank")?;
        writeln!(f, "{}", RULE)?;
        for entry in &self.client_ips {
            writeln!(f, "{}", entry)?;
        }

        writeln!(f)?;
        writeln!(f, "Host Rank")?;
        writeln!(f, "{}", RULE)?;
        for entry in &self.names {
            writeln!(f, "{}", entry)?;
        }

        Ok(())
    }
}

impl fmt::Display for RankEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:.2}%", self.key, self.count, self.percentage)
    }
}
