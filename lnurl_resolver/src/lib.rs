pub mod address;
pub mod client;
pub mod guard;
pub mod transport;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use address::PaymentAddress;
pub use client::LnurlClient;
pub use transport::{HttpTransport, ReqwestTransport};

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_USER_AGENT: &str = "lnurl_resolver/0.1";

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientSettings {
    /// Deadline of each of the two round trips.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Connect only to resolved addresses that pass the host guard.
    #[serde(default = "default_true")]
    pub pin_resolved_hosts: bool,
    /// Reject `lnurl1...` strings whose bech32 checksum does not match.
    #[serde(default = "default_true")]
    pub strict_checksum: bool,
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            user_agent: default_user_agent(),
            pin_resolved_hosts: true,
            strict_checksum: true,
        }
    }
}
