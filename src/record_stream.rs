//! Line-by-line reading of a resolver log file

use crate::errors::{CollectorError, Result};
use crate::log_parser::LogParser;
use crate::record::QueryRecord;

use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// Forward-only sequence of query records read from one file.
///
/// Rejected lines are logged and skipped. Reopen the path to start over.
pub struct RecordStream<'a> {
    path: PathBuf,
    reader: BufReader<File>,
    parser: &'a dyn LogParser,
    buf: Vec<u8>,
    line_number: u64,
    skipped_lines: u64,
}

impl<'a> RecordStream<'a> {
    /// Open `path` for reading
    pub async fn open(path: impl AsRef<Path>, parser: &'a dyn LogParser) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .await
            .map_err(|source| CollectorError::UnreadableFile {
                path: path.display().to_string(),
                source,
            })?;

        debug!("Opened log file {}", path.display());

        Ok(Self {
            path,
            reader: BufReader::new(file),
            parser,
            buf: Vec::new(),
            line_number: 0,
            skipped_lines: 0,
        })
    }

    /// Next parsed record, or `None` at end of file
    pub async fn next_record(&mut self) -> Result<Option<QueryRecord>> {
        loop {
            self.buf.clear();
            let bytes_read = self.reader.read_until(b'\n', &mut self.buf).await?;

            if bytes_read == 0 {
                return Ok(None);
            }

            self.line_number += 1;

            let line = String::from_utf8_lossy(&self.buf);
            let line = line.trim_end_matches(['\n', '\r']);

            match self.parser.parse_line(line) {
                Ok(record) => return Ok(Some(record)),
                Err(e) => {
                    self.skipped_lines += 1;
                    warn!(
                        "Skipping line {} of {}: {}",
                        self.line_number,
                        self.path.display(),
                        e
                    );
                }
            }
        }
    }

    /// Lines rejected by the parser so far
    pub fn skipped_lines(&self) -> u64 {
        self.skipped_lines
    }

    /// Lines read so far, including rejected ones
    pub fn lines_read(&self) -> u64 {
        self.line_number
    }
}
