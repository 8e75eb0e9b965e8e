use serde::{Deserialize, Serialize};

use crate::Msats;

pub const PAY_REQUEST_TAG: &str = "payRequest";
pub const ERROR_STATUS: &str = "ERROR";

/// First-phase response of an LNURL-pay endpoint.
///
/// Every field is defaulted so that a response missing `callback` or the
/// sendable bounds still deserializes and is rejected by the resolver with a
/// protocol error naming the missing piece.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEndpoint {
    #[serde(default)]
    pub callback: String,
    #[serde(default)]
    pub min_sendable: Msats,
    #[serde(default)]
    pub max_sendable: Msats,
    #[serde(default)]
    pub metadata: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub allows_nostr: bool,
    #[serde(default)]
    pub nostr_pubkey: Option<String>,
    #[serde(default)]
    pub comment_allowed: u64,
}

impl PaymentEndpoint {
    pub fn contains_amount(&self, amount_msats: Msats) -> bool {
        self.min_sendable <= amount_msats && amount_msats <= self.max_sendable
    }

    /// Whether the endpoint advertises zap support with a usable key.
    /// Gating zaps on this is left to callers.
    pub fn accepts_zaps(&self) -> bool {
        self.allows_nostr
            && self
                .nostr_pubkey
                .as_ref()
                .map(|key| key.len() == 64 && key.chars().all(|c| c.is_ascii_hexdigit()))
                .unwrap_or(false)
    }
}

/// Explicit error shape either phase may answer with.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LnurlStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl LnurlStatus {
    pub fn is_error(&self) -> bool {
        matches!(&self.status, Some(status) if status.eq_ignore_ascii_case(ERROR_STATUS))
    }
}

/// Second-phase response. `routes` is part of the wire format but unused.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvoiceResponse {
    #[serde(default)]
    pub pr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct InvoiceRequest {
    pub amount_msats: Msats,
    /// Signed kind 9734 event serialized as json.
    pub zap_request: Option<String>,
    /// Address the endpoint was resolved from, only sent next to a zap request.
    pub original_address: Option<String>,
    pub comment: Option<String>,
}

impl InvoiceRequest {
    pub fn new(amount_msats: Msats) -> Self {
        Self {
            amount_msats,
            ..Default::default()
        }
    }

    pub fn with_zap_request(mut self, zap_request: String, original_address: Option<String>) -> Self {
        self.zap_request = Some(zap_request);
        self.original_address = original_address;
        self
    }

    pub fn with_comment(mut self, comment: String) -> Self {
        self.comment = Some(comment);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_endpoint_from_json() {
        let body = r#"{
            "callback": "https://example.com/lnurlp/alice/callback",
            "minSendable": 1000,
            "maxSendable": 1000000000,
            "metadata": "[[\"text/plain\",\"Pay alice\"]]",
            "tag": "payRequest",
            "allowsNostr": true,
            "nostrPubkey": "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
            "commentAllowed": 140
        }"#;
        let endpoint: PaymentEndpoint = serde_json::from_str(body).unwrap();
        assert_eq!(endpoint.tag, PAY_REQUEST_TAG);
        assert_eq!(endpoint.min_sendable, 1000);
        assert_eq!(endpoint.comment_allowed, 140);
        assert!(endpoint.accepts_zaps());
        assert!(endpoint.contains_amount(1000));
        assert!(!endpoint.contains_amount(999));
    }

    #[test]
    fn test_missing_fields_default() {
        let endpoint: PaymentEndpoint = serde_json::from_str(r#"{"tag": "payRequest"}"#).unwrap();
        assert!(endpoint.callback.is_empty());
        assert_eq!(endpoint.max_sendable, 0);
        assert!(!endpoint.accepts_zaps());
    }

    #[test]
    fn test_error_status() {
        let status: LnurlStatus = serde_json::from_str(r#"{"status": "ERROR", "reason": "no such user"}"#).unwrap();
        assert!(status.is_error());
        let status: LnurlStatus = serde_json::from_str(r#"{"pr": "lnbc1", "routes": []}"#).unwrap();
        assert!(!status.is_error());
    }
}
