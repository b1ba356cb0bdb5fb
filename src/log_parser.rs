//! Positional parser for BIND query log lines
//!
//! Expected line shape (whitespace separated):
//!
//! ```text
//! 18-May-2021 16:34:13.003 queries: info: client @0x55adcc672cc0 45.231.61.2#80 (pizzaseo.com): query: pizzaseo.com IN A +E(0)D (172.20.101.44)
//! ```
//!
//! Only the tokens at fixed positions are read. No attempt is made to
//! recover from lines of a different shape beyond the token count guard.

use crate::record::QueryRecord;
use chrono::NaiveDate;
use std::fmt;

/// Fewest tokens a query line can have.
pub const MIN_TOKENS: usize = 12;

const DATE_FORMAT: &str = "%d-%b-%Y";

const DATE_TOKEN: usize = 0;
const TIME_TOKEN: usize = 1;
const CLIENT_NAME_TOKEN: usize = 5;
const CLIENT_ADDR_TOKEN: usize = 6;
const QUERY_NAME_TOKEN: usize = 9;
const QUERY_TYPE_TOKEN: usize = 11;

/// Reason a single line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer than `MIN_TOKENS` tokens
    MalformedLine { tokens: usize },

    /// Date token does not match `day-Mon-Year`
    InvalidDate(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedLine { tokens } => write!(
                f,
                "malformed line: expected at least {} tokens, found {}",
                MIN_TOKENS, tokens
            ),
            ParseError::InvalidDate(token) => write!(f, "invalid date: {:?}", token),
        }
    }
}

impl std::error::Error for ParseError {}

/// Trait for turning a raw log line into a query record
pub trait LogParser: Send + Sync {
    fn parse_line(&self, line: &str) -> Result<QueryRecord, ParseError>;
}

/// Parser for BIND `queries` category lines
#[derive(Debug, Default, Clone, Copy)]
pub struct BindLogParser;

impl BindLogParser {
    pub fn new() -> Self {
        Self
    }
}

impl LogParser for BindLogParser {
    fn parse_line(&self, line: &str) -> Result<QueryRecord, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.len() < MIN_TOKENS {
            return Err(ParseError::MalformedLine {
                tokens: tokens.len(),
            });
        }

        let date = convert_date(tokens[DATE_TOKEN])?;
        let timestamp = format!("{}T{}Z", date, tokens[TIME_TOKEN]);

        let client_name = tokens[CLIENT_NAME_TOKEN]
            .strip_prefix('@')
            .unwrap_or(tokens[CLIENT_NAME_TOKEN]);

        // Drop the `#port` suffix
        let client_ip = tokens[CLIENT_ADDR_TOKEN]
            .split('#')
            .next()
            .unwrap_or_default();

        Ok(QueryRecord {
            timestamp,
            name: tokens[QUERY_NAME_TOKEN].to_string(),
            client_ip: client_ip.to_string(),
            client_name: client_name.to_string(),
            query_type: tokens[QUERY_TYPE_TOKEN].to_string(),
        })
    }
}

/// Convert `18-May-2021` into `2021-05-18`
fn convert_date(token: &str) -> Result<String, ParseError> {
    // chrono's %Y takes any digit count, the log always writes four
    let four_digit_year = token
        .rsplit('-')
        .next()
        .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()));

    if !four_digit_year {
        return Err(ParseError::InvalidDate(token.to_string()));
    }

    NaiveDate::parse_from_str(token, DATE_FORMAT)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| ParseError::InvalidDate(token.to_string()))
}
