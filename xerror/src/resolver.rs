use err_derive::Error;
use serde::Serialize;

use crate::codec::CodecError;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum HttpError {
    #[error(display = "Server responded with status {}.", _0)]
    Status(u16),
    #[error(display = "Request failed: {}.", _0)]
    Transport(String),
    #[error(display = "Request timed out.")]
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ResolverError {
    #[error(display = "Malformed payment address: {}.", _0)]
    Format(String),
    #[error(display = "Could not decode payment address: {}", _0)]
    Codec(CodecError),
    #[error(display = "Unsupported url scheme {:?}.", _0)]
    Scheme(String),
    #[error(display = "Blocked outbound request: {}.", _0)]
    SsrfBlocked(String),
    #[error(display = "Http error: {}", _0)]
    Http(HttpError),
    #[error(display = "Payment endpoint violated the protocol: {}.", _0)]
    Protocol(String),
    #[error(display = "Invalid invoice request: {}.", _0)]
    Validation(String),
}

impl ResolverError {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": "ERROR",
            "reason": self.to_string(),
        })
    }
}

impl From<CodecError> for ResolverError {
    fn from(err: CodecError) -> Self {
        ResolverError::Codec(err)
    }
}

impl From<HttpError> for ResolverError {
    fn from(err: HttpError) -> Self {
        ResolverError::Http(err)
    }
}

impl From<serde_json::Error> for ResolverError {
    fn from(err: serde_json::Error) -> Self {
        ResolverError::Protocol(format!("invalid json body ({})", err))
    }
}
