use std::fmt;

use serde::{Deserialize, Serialize};

pub mod lnurl;
pub mod nostr;

pub type Msats = u64;

/// A payable BOLT11 invoice as returned by a payment endpoint callback.
/// Its content is opaque here; only non-emptiness is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Invoice(String);

impl Invoice {
    pub fn new(payment_request: String) -> Option<Self> {
        if payment_request.trim().is_empty() {
            return None;
        }
        Some(Self(payment_request))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
