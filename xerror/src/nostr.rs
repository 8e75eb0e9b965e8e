use err_derive::Error;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum ZapError {
    #[error(display = "Zap request is not valid json.")]
    InvalidJson,
    #[error(display = "Zap request id does not match its content.")]
    InvalidId,
    #[error(display = "Zap request signature is invalid.")]
    InvalidSignature,
    #[error(display = "Event is not a zap request.")]
    NotZapRequest,
    #[error(display = "Zap request has no tags.")]
    NoTags,
    #[error(display = "Zap request has no pubkey tag.")]
    NoPubkeyTag,
    #[error(display = "Zap request has more than one event tag.")]
    InvalidEventTagCount,
    #[error(display = "Zap request has no relays.")]
    NoRelays,
    #[error(display = "Zap request amount does not match the invoice amount.")]
    AmountMismatch,
}
