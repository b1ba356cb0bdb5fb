use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bind_query_collector", version)]
#[command(about = "Forward BIND query logs to an ingestion API and rank clients and hosts", long_about = None)]
pub struct Args {
    /// BIND query log file to process
    #[arg(value_name = "LOG_FILE")]
    pub log_file: PathBuf,
}
