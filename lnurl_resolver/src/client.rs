use std::sync::Arc;

use core_types::lnurl::{InvoiceRequest, InvoiceResponse, LnurlStatus, PaymentEndpoint, PAY_REQUEST_TAG};
use core_types::Invoice;
use slog as log;
use slog::Logger;
use url::Url;
use xerror::resolver::{HttpError, ResolverError};

use crate::address::{strip_uri_scheme, PaymentAddress};
use crate::guard;
use crate::transport::{HttpRequest, HttpTransport, ACCEPT_JSON};
use crate::ClientSettings;

/// Turns payment addresses into invoices over LNURL-pay.
///
/// Every url, including the callback a payment endpoint hands back, passes
/// the host guard right before it is requested. There are no retries: each
/// phase is one round trip that either succeeds or fails with a typed error.
pub struct LnurlClient {
    transport: Arc<dyn HttpTransport>,
    settings: ClientSettings,
    logger: Logger,
}

impl LnurlClient {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: ClientSettings, logger: Logger) -> Self {
        Self {
            transport,
            settings,
            logger,
        }
    }

    /// Maps a lightning address or lnurl to the url of its payment endpoint.
    pub fn resolve_address(&self, address: &str) -> Result<Url, ResolverError> {
        let candidate = PaymentAddress::parse(address)?.candidate_url(self.settings.strict_checksum)?;
        guard::validate_external_url(&candidate).map_err(|err| self.log_rejection(&candidate, err))
    }

    pub fn fetch_payment_endpoint(&self, url: &Url) -> Result<PaymentEndpoint, ResolverError> {
        let body = self.get_json(url)?;
        let endpoint = serde_json::from_value::<PaymentEndpoint>(body)?;

        if endpoint.tag != PAY_REQUEST_TAG {
            return Err(self.protocol_error(url, format!("unexpected tag {:?}", endpoint.tag)));
        }
        if endpoint.callback.trim().is_empty() {
            return Err(self.protocol_error(url, String::from("callback is empty")));
        }
        if endpoint.min_sendable == 0 || endpoint.max_sendable == 0 {
            return Err(self.protocol_error(url, String::from("sendable bounds must be positive")));
        }
        if endpoint.min_sendable > endpoint.max_sendable {
            return Err(self.protocol_error(url, String::from("minSendable exceeds maxSendable")));
        }

        log::debug!(
            self.logger,
            "Fetched payment endpoint {}: {}..{} msats",
            url,
            endpoint.min_sendable,
            endpoint.max_sendable
        );
        Ok(endpoint)
    }

    /// Second phase. Whether the endpoint allows zaps is for the caller to
    /// check, a supplied zap request is always forwarded.
    pub fn request_invoice(
        &self,
        endpoint: &PaymentEndpoint,
        request: &InvoiceRequest,
    ) -> Result<Invoice, ResolverError> {
        let mut callback = guard::validate_external_url(&endpoint.callback)
            .map_err(|err| self.log_rejection(&endpoint.callback, err))?;

        let amount = request.amount_msats;
        if !endpoint.contains_amount(amount) {
            let reason = if amount < endpoint.min_sendable {
                format!("amount {} msats is below minSendable {}", amount, endpoint.min_sendable)
            } else {
                format!("amount {} msats is above maxSendable {}", amount, endpoint.max_sendable)
            };
            return Err(ResolverError::Validation(reason));
        }
        if let Some(comment) = &request.comment {
            let length = comment.chars().count() as u64;
            if length > endpoint.comment_allowed {
                return Err(ResolverError::Validation(format!(
                    "comment of {} characters exceeds commentAllowed {}",
                    length, endpoint.comment_allowed
                )));
            }
        }

        {
            let mut query = callback.query_pairs_mut();
            query.append_pair("amount", &amount.to_string());
            if let Some(zap_request) = &request.zap_request {
                query.append_pair("nostr", zap_request);
                if let Some(original_address) = &request.original_address {
                    query.append_pair("lnurl", original_address);
                }
            }
            if let Some(comment) = &request.comment {
                query.append_pair("comment", comment);
            }
        }

        let body = self.get_json(&callback)?;
        let response = serde_json::from_value::<InvoiceResponse>(body)?;
        let invoice = Invoice::new(response.pr)
            .ok_or_else(|| self.protocol_error(&callback, String::from("callback returned no invoice")))?;

        log::info!(
            self.logger,
            "Received invoice for {} msats from {}",
            amount,
            callback.host_str().unwrap_or_default()
        );
        Ok(invoice)
    }

    /// Resolve, fetch and request in one go.
    pub fn fetch_invoice(&self, address: &str, mut request: InvoiceRequest) -> Result<Invoice, ResolverError> {
        let url = self.resolve_address(address)?;
        let endpoint = self.fetch_payment_endpoint(&url)?;
        if request.zap_request.is_some() && request.original_address.is_none() {
            request.original_address = Some(strip_uri_scheme(address).to_string());
        }
        self.request_invoice(&endpoint, &request)
    }

    /// Guarded GET returning the json body. Non-2xx answers and the explicit
    /// `{"status": "ERROR"}` shape are turned into errors here.
    fn get_json(&self, url: &Url) -> Result<serde_json::Value, ResolverError> {
        guard::validate_url(url).map_err(|err| self.log_rejection(url.as_str(), err))?;
        let request = HttpRequest {
            url,
            accept: ACCEPT_JSON,
            timeout: self.settings.request_timeout(),
        };
        let response = self.transport.get(&request).map_err(|err| {
            log::warn!(self.logger, "Request to {} failed: {}", url, err);
            ResolverError::Http(err)
        })?;

        if !response.is_success() {
            log::warn!(self.logger, "Request to {} answered with status {}", url, response.status);
            return Err(ResolverError::Http(HttpError::Status(response.status)));
        }

        let body = serde_json::from_slice::<serde_json::Value>(&response.body)?;
        if let Ok(status) = serde_json::from_value::<LnurlStatus>(body.clone()) {
            if status.is_error() {
                let reason = status.reason.unwrap_or_else(|| String::from("no reason given"));
                return Err(self.protocol_error(url, reason));
            }
        }
        Ok(body)
    }

    fn protocol_error(&self, url: &Url, reason: String) -> ResolverError {
        log::error!(self.logger, "Payment endpoint {} violated the protocol: {}", url, reason);
        ResolverError::Protocol(reason)
    }

    fn log_rejection(&self, url: &str, err: ResolverError) -> ResolverError {
        log::warn!(self.logger, "Refusing to contact {}: {}", url, err);
        err
    }
}
