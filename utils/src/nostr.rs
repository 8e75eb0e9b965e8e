use core_types::nostr::{NostrEvent, ZAP_REQUEST_KIND};
use lazy_static::lazy_static;
use secp256k1::{schnorr, Message, Secp256k1, VerifyOnly, XOnlyPublicKey};
use slog::Logger;
use xerror::nostr::ZapError;

pub const SIGNATURE_HEX_LEN: usize = 128;
pub const PUBKEY_HEX_LEN: usize = 64;
pub const EVENT_ID_HEX_LEN: usize = 64;

lazy_static! {
    static ref VERIFIER: Secp256k1<VerifyOnly> = Secp256k1::verification_only();
}

fn check_signature(signature_hex: &str, pubkey_hex: &str, message_id_hex: &str) -> Result<(), &'static str> {
    if signature_hex.len() != SIGNATURE_HEX_LEN {
        return Err("signature has wrong length");
    }
    if pubkey_hex.len() != PUBKEY_HEX_LEN {
        return Err("pubkey has wrong length");
    }
    if message_id_hex.len() != EVENT_ID_HEX_LEN {
        return Err("message id has wrong length");
    }

    let signature = hex::decode(signature_hex).map_err(|_| "signature is not hex")?;
    let pubkey = hex::decode(pubkey_hex).map_err(|_| "pubkey is not hex")?;
    let message_id = hex::decode(message_id_hex).map_err(|_| "message id is not hex")?;

    let signature = schnorr::Signature::from_slice(&signature).map_err(|_| "malformed signature")?;
    let pubkey = XOnlyPublicKey::from_slice(&pubkey).map_err(|_| "pubkey is not a curve point")?;
    let message = Message::from_slice(&message_id).map_err(|_| "malformed message id")?;

    VERIFIER
        .verify_schnorr(&signature, &message, &pubkey)
        .map_err(|_| "signature does not verify")
}

/// Checks a BIP-340 signature over the raw bytes of `message_id_hex`.
///
/// The id is taken as given. Whether it really is the hash of the message
/// is not checked here, see [`verify_event`] for that.
pub fn verify_signature(signature_hex: &str, pubkey_hex: &str, message_id_hex: &str) -> bool {
    check_signature(signature_hex, pubkey_hex, message_id_hex).is_ok()
}

pub fn verify_signature_logged(logger: &Logger, signature_hex: &str, pubkey_hex: &str, message_id_hex: &str) -> bool {
    match check_signature(signature_hex, pubkey_hex, message_id_hex) {
        Ok(()) => true,
        Err(reason) => {
            slog::debug!(logger, "Rejected signature by {}: {}", pubkey_hex, reason);
            false
        }
    }
}

/// NIP-01 id: sha256 of `[0, pubkey, created_at, kind, tags, content]`.
pub fn compute_event_id(event: &NostrEvent) -> String {
    let serialized = serde_json::json!([0, event.pubkey, event.created_at, event.kind, event.tags, event.content]);
    sha256::digest(serialized.to_string().as_str())
}

pub fn event_id_matches(event: &NostrEvent) -> bool {
    compute_event_id(event).eq_ignore_ascii_case(&event.id)
}

/// Full check of an inbound event: the id is recomputed before the
/// signature over it is trusted.
pub fn verify_event(event: &NostrEvent) -> bool {
    event_id_matches(event) && verify_signature(&event.sig, &event.pubkey, &event.id)
}

/// Validates a NIP-57 zap request meant for an invoice of `invoice_amount` msats.
pub fn validate_zap_request(json: &str, invoice_amount: u64) -> Result<NostrEvent, ZapError> {
    let nostr_event = NostrEvent::from_json(json).map_err(|_| ZapError::InvalidJson)?;

    if !event_id_matches(&nostr_event) {
        return Err(ZapError::InvalidId);
    }

    if !verify_signature(&nostr_event.sig, &nostr_event.pubkey, &nostr_event.id) {
        return Err(ZapError::InvalidSignature);
    }

    if nostr_event.kind != ZAP_REQUEST_KIND {
        return Err(ZapError::NotZapRequest);
    }

    if nostr_event.tags.is_empty() {
        return Err(ZapError::NoTags);
    }

    let pubkey_tags_count = nostr_event.tag_values("p").count();
    let event_tags_count = nostr_event.tag_values("e").count();
    let relays = nostr_event.tag_values("relays").last().unwrap_or_default();
    let amount = nostr_event
        .tag_values("amount")
        .last()
        .and_then(|values| values.first())
        .and_then(|value| value.parse::<u64>().ok());

    if pubkey_tags_count < 1 {
        return Err(ZapError::NoPubkeyTag);
    }

    if event_tags_count > 1 {
        return Err(ZapError::InvalidEventTagCount);
    }

    if relays.is_empty() {
        return Err(ZapError::NoRelays);
    }

    if let Some(value) = amount {
        if value != invoice_amount {
            return Err(ZapError::AmountMismatch);
        }
    }

    Ok(nostr_event)
}
