//! Fixed-size chunking of query records for delivery

use crate::errors::{CollectorError, Result};
use crate::record::QueryRecord;
use tracing::debug;

/// Accumulates records in arrival order and hands out full chunks
#[derive(Debug)]
pub struct ChunkBuffer {
    records: Vec<QueryRecord>,
    batch_size: usize,
}

impl ChunkBuffer {
    /// Create a new chunk buffer holding up to `batch_size` records
    pub fn new(batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(CollectorError::InvalidBatchSize);
        }

        Ok(Self {
            records: Vec::with_capacity(batch_size),
            batch_size,
        })
    }

    /// Add a record, returning the chunk it completed, if any
    pub fn push(&mut self, record: QueryRecord) -> Option<Vec<QueryRecord>> {
        self.records.push(record);

        if self.records.len() < self.batch_size {
            return None;
        }

        let chunk = std::mem::replace(&mut self.records, Vec::with_capacity(self.batch_size));
        debug!("Chunk of {} records ready", chunk.len());
        Some(chunk)
    }

    /// Take whatever is left as a final short chunk
    pub fn flush(&mut self) -> Option<Vec<QueryRecord>> {
        if self.records.is_empty() {
            return None;
        }

        let chunk = std::mem::take(&mut self.records);
        debug!("Flushed final chunk of {} records", chunk.len());
        Some(chunk)
    }

    /// Records waiting for the current chunk to fill
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}
