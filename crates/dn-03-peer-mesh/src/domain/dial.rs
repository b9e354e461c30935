//! # Dial Requests
//!
//! One batch of peers for the control API's `dial_peers` endpoint.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

/// Characters left literal in the `peers` query value.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_');

/// Path of the dial endpoint on the control API.
pub const DIAL_PEERS_PATH: &str = "/dial_peers";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialRequest {
    /// Connection strings, `node_id@ip:port`.
    pub peers: Vec<String>,
    pub persistent: bool,
}

impl DialRequest {
    /// Dynamic dials never persist peers.
    pub fn unsafe_batch(peers: Vec<String>) -> Self {
        Self {
            peers,
            persistent: false,
        }
    }

    /// Bracketed, quoted, comma-joined list: `["a@ip:port","b@ip:port"]`.
    pub fn peers_param(&self) -> String {
        let quoted: Vec<String> = self.peers.iter().map(|p| format!("\"{}\"", p)).collect();
        format!("[{}]", quoted.join(","))
    }

    /// Query string, already percent-encoded.
    pub fn query(&self) -> String {
        format!(
            "peers={}&persistent={}",
            utf8_percent_encode(&self.peers_param(), QUERY_ENCODE_SET),
            self.persistent
        )
    }

    /// Path and query for the control API.
    pub fn path_and_query(&self) -> String {
        format!("{}?{}", DIAL_PEERS_PATH, self.query())
    }
}

impl fmt::Display for DialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} peers)", DIAL_PEERS_PATH, self.peers.len())
    }
}
