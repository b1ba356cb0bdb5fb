//! Query record extracted from one resolver log line

use serde::{Deserialize, Serialize};

/// One DNS query as sent to the ingestion endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRecord {
    pub timestamp: String,
    pub name: String,
    pub client_ip: String,
    pub client_name: String,
    #[serde(rename = "type")]
    pub query_type: String,
}
