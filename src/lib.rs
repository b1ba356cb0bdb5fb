//! BIND Query Log Collector Library
//!
//! Reads query lines from a BIND resolver log, forwards them in fixed-size
//! chunks to an ingestion API and ranks the busiest clients and hosts.

pub mod buffer;
pub mod cli;
pub mod collector;
pub mod config;
pub mod errors;
pub mod log_parser;
pub mod record;
pub mod record_stream;
pub mod report;
pub mod stats;
pub mod transport;

pub use collector::{QueryCollector, RunSummary};
pub use config::Config;
pub use errors::{CollectorError, Result};
pub use record::QueryRecord;
pub use report::Report;
pub use transport::{Delivery, DeliveryOutcome, HttpTransport};
