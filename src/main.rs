//! BIND Query Log Collector Binary

use bind_query_collector::cli::Args;
use bind_query_collector::report::{DEFAULT_TOP_N, Report};
use bind_query_collector::{Config, HttpTransport, QueryCollector};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    initialize_tracing();

    info!("Starting BIND query collector v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration validation failed: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Collector configuration - Endpoint: {}, Collector: {}, Batch size: {}",
        config.api_url, config.collector_id, config.batch_size
    );

    let transport = match HttpTransport::from_config(&config) {
        Ok(transport) => transport,
        Err(e) => {
            error!("Failed to create HTTP transport: {}", e);
            std::process::exit(1);
        }
    };

    let collector = QueryCollector::new(transport, config.batch_size);

    match collector.run(&args.log_file).await {
        Ok(summary) => print!("{}", Report::from_stats(&summary.stats, DEFAULT_TOP_N)),
        Err(e) => {
            error!("Collector failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize structured logging on stderr
fn initialize_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
