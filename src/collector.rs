//! Single-pass pipeline: log file to ingestion API plus statistics

use crate::buffer::ChunkBuffer;
use crate::errors::Result;
use crate::log_parser::{BindLogParser, LogParser};
use crate::record::QueryRecord;
use crate::record_stream::RecordStream;
use crate::stats::QueryStats;
use crate::transport::Delivery;

use std::path::Path;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Drives one ordered pass over a log file
pub struct QueryCollector<D: Delivery> {
    parser: Box<dyn LogParser>,
    delivery: D,
    batch_size: usize,
    run_id: String,
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub records: u64,
    pub skipped_lines: u64,
    pub chunks_delivered: u64,
    pub chunks_failed: u64,
    pub stats: QueryStats,
}

impl RunSummary {
    pub fn chunks_attempted(&self) -> u64 {
        self.chunks_delivered + self.chunks_failed
    }
}

impl<D: Delivery> QueryCollector<D> {
    /// Create a collector using the BIND parser
    pub fn new(delivery: D, batch_size: usize) -> Self {
        Self::with_parser(Box::new(BindLogParser::new()), delivery, batch_size)
    }

    pub fn with_parser(parser: Box<dyn LogParser>, delivery: D, batch_size: usize) -> Self {
        Self {
            parser,
            delivery,
            batch_size,
            run_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Read `path`, deliver every chunk once and count every record.
    ///
    /// Only an unreadable file or an invalid batch size fails the run.
    #[instrument(skip(self, path), fields(run_id = %self.run_id))]
    pub async fn run(&self, path: impl AsRef<Path>) -> Result<RunSummary> {
        let path = path.as_ref();
        let mut buffer = ChunkBuffer::new(self.batch_size)?;
        let mut stream = RecordStream::open(path, self.parser.as_ref()).await?;

        info!(
            "Processing {} in chunks of {}",
            path.display(),
            buffer.batch_size()
        );

        let mut summary = RunSummary {
            run_id: self.run_id.clone(),
            records: 0,
            skipped_lines: 0,
            chunks_delivered: 0,
            chunks_failed: 0,
            stats: QueryStats::new(),
        };

        while let Some(record) = stream.next_record().await? {
            summary.records += 1;
            summary.stats.record(&record);

            if let Some(chunk) = buffer.push(record) {
                self.send_chunk(chunk, &mut summary).await;
            }
        }

        if let Some(chunk) = buffer.flush() {
            self.send_chunk(chunk, &mut summary).await;
        }

        summary.skipped_lines = stream.skipped_lines();

        if summary.chunks_failed > 0 {
            warn!(
                "{} of {} chunks could not be delivered",
                summary.chunks_failed,
                summary.chunks_attempted()
            );
        }

        info!(
            "Finished {}: {} records, {} skipped lines, {} chunks delivered, {} failed",
            path.display(),
            summary.records,
            summary.skipped_lines,
            summary.chunks_delivered,
            summary.chunks_failed
        );

        Ok(summary)
    }

    async fn send_chunk(&self, chunk: Vec<QueryRecord>, summary: &mut RunSummary) {
        let chunk_number = summary.chunks_attempted() + 1;
        debug!(chunk = chunk_number, records = ?chunk, "Delivering chunk");

        let outcome = self.delivery.deliver(chunk).await;

        if outcome.is_success() {
            summary.chunks_delivered += 1;
        } else {
            summary.chunks_failed += 1;
            warn!("Chunk {} not delivered: {}", chunk_number, outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CollectorError;
    use crate::transport::DeliveryOutcome;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    /// Records chunk sizes and fails every chunk whose index is listed
    #[derive(Default)]
    struct RecordingDelivery {
        chunks: Mutex<Vec<Vec<QueryRecord>>>,
        fail_indices: Vec<usize>,
    }

    #[async_trait]
    impl Delivery for RecordingDelivery {
        async fn deliver(&self, chunk: Vec<QueryRecord>) -> DeliveryOutcome {
            let mut chunks = self.chunks.lock().unwrap();
            let index = chunks.len();
            chunks.push(chunk);

            if self.fail_indices.contains(&index) {
                DeliveryOutcome::Rejected {
                    status: 500,
                    body: "boom".to_string(),
                }
            } else {
                DeliveryOutcome::Delivered { status: 200 }
            }
        }
    }

    fn line(i: usize) -> String {
        format!(
            "18-May-2021 16:34:{:02}.003 queries: info: client @0x{:x} 10.0.0.{}#53 (host{}.com): query: host{}.com IN A +E(0)D (172.20.101.44)",
            i % 60,
            i,
            i % 4,
            i % 7,
            i % 7
        )
    }

    fn write_log(lines: &[String]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for l in lines {
            writeln!(file, "{}", l).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn sizes(delivery: &RecordingDelivery) -> Vec<usize> {
        delivery.chunks.lock().unwrap().iter().map(Vec::len).collect()
    }

    #[tokio::test]
    async fn test_chunks_follow_batch_size() {
        let lines: Vec<String> = (0..1203).map(line).collect();
        let file = write_log(&lines);

        let collector = QueryCollector::new(RecordingDelivery::default(), 500);
        let summary = collector.run(file.path()).await.unwrap();

        assert_eq!(sizes(&collector.delivery), vec![500, 500, 203]);
        assert_eq!(summary.records, 1203);
        assert_eq!(summary.chunks_delivered, 3);
        assert_eq!(summary.stats.total_records(), 1203);
    }

    #[tokio::test]
    async fn test_failed_chunk_does_not_stop_run() {
        let lines: Vec<String> = (0..10).map(line).collect();
        let file = write_log(&lines);

        let delivery = RecordingDelivery {
            fail_indices: vec![0],
            ..Default::default()
        };
        let collector = QueryCollector::new(delivery, 4);
        let summary = collector.run(file.path()).await.unwrap();

        assert_eq!(sizes(&collector.delivery), vec![4, 4, 2]);
        assert_eq!(summary.chunks_failed, 1);
        assert_eq!(summary.chunks_delivered, 2);
        assert_eq!(summary.stats.total_records(), 10);
    }

    #[tokio::test]
    async fn test_malformed_lines_are_counted_not_sent() {
        let mut lines: Vec<String> = (0..3).map(line).collect();
        lines.insert(1, "garbage".to_string());
        lines.push("99-Xyz-2021 00:00:00 queries: info: client @a 1.1.1.1#1 (x): query: x IN A +".to_string());
        let file = write_log(&lines);

        let collector = QueryCollector::new(RecordingDelivery::default(), 10);
        let summary = collector.run(file.path()).await.unwrap();

        assert_eq!(summary.records, 3);
        assert_eq!(summary.skipped_lines, 2);
        assert_eq!(sizes(&collector.delivery), vec![3]);

        let delivered = collector.delivery.chunks.lock().unwrap();
        assert_eq!(delivered[0][1].client_ip, "10.0.0.1");
    }

    #[tokio::test]
    async fn test_empty_file_sends_nothing() {
        let file = write_log(&[]);

        let collector = QueryCollector::new(RecordingDelivery::default(), 10);
        let summary = collector.run(file.path()).await.unwrap();

        assert_eq!(summary.records, 0);
        assert_eq!(summary.chunks_attempted(), 0);
        assert!(collector.delivery.chunks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_file_fails_run() {
        let collector = QueryCollector::new(RecordingDelivery::default(), 10);
        let result = collector.run("/nonexistent/query.log").await;

        assert!(matches!(result, Err(CollectorError::UnreadableFile { .. })));
    }

    #[tokio::test]
    async fn test_zero_batch_size_fails_run() {
        let file = write_log(&[line(0)]);
        let collector = QueryCollector::new(RecordingDelivery::default(), 0);

        assert!(matches!(
            collector.run(file.path()).await,
            Err(CollectorError::InvalidBatchSize)
        ));
    }
}
