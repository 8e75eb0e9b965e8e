use core_types::lnurl::InvoiceRequest;
use core_types::nostr::{NostrEvent, NostrProfile};
use core_types::Msats;
use lnurl_resolver::LnurlClient;
use serde_json::{json, Value};
use structopt::StructOpt;
use xerror::resolver::ResolverError;

#[derive(Debug, StructOpt)]
pub enum Action {
    /// Print the payment endpoint url of a lightning address or lnurl.
    Resolve { address: String },
    /// Fetch the payment endpoint and print it.
    Endpoint { address: String },
    /// Request an invoice from a lightning address or lnurl.
    Invoice {
        address: String,
        #[structopt(short = "a", long = "amount")]
        amount_msats: Msats,
        #[structopt(long = "zap-request")]
        zap_request: Option<String>,
        #[structopt(short = "c", long = "comment")]
        comment: Option<String>,
    },
    EncodeNpub { pubkey: String },
    DecodeNpub { npub: String },
    EncodeNote { event_id: String },
    DecodeNote { note: String },
    EncodeLnurl {
        url: String,
        #[structopt(short = "q")]
        q: Option<String>,
    },
    DecodeLnurl { lnurl: String },
    VerifySignature {
        #[structopt(long = "sig")]
        signature: String,
        #[structopt(long = "pubkey")]
        pubkey: String,
        #[structopt(long = "id")]
        event_id: String,
    },
    /// Pick the payment address of a kind 0 profile content and resolve it.
    ProfileAddress { profile: String },
    /// Recompute the id of a json event and check its signature.
    VerifyEvent { event: String },
    ValidateZap {
        zap_request: String,
        #[structopt(short = "a", long = "amount")]
        amount_msats: Msats,
    },
}

impl Action {
    pub fn execute(self, client: &LnurlClient) -> Result<Value, ResolverError> {
        match self {
            Self::Resolve { address } => {
                let url = client.resolve_address(&address)?;
                Ok(json!({ "url": url.as_str() }))
            }
            Self::Endpoint { address } => {
                let url = client.resolve_address(&address)?;
                let endpoint = client.fetch_payment_endpoint(&url)?;
                Ok(serde_json::to_value(endpoint)?)
            }
            Self::Invoice {
                address,
                amount_msats,
                zap_request,
                comment,
            } => {
                let mut request = InvoiceRequest::new(amount_msats);
                if let Some(zap_request) = zap_request {
                    request = request.with_zap_request(zap_request, None);
                }
                if let Some(comment) = comment {
                    request = request.with_comment(comment);
                }
                let invoice = client.fetch_invoice(&address, request)?;
                Ok(json!({ "pr": invoice.as_str() }))
            }
            Self::EncodeNpub { pubkey } => Ok(json!({ "npub": utils::nip19::encode_npub(&pubkey)? })),
            Self::DecodeNpub { npub } => Ok(json!({ "pubkey": utils::nip19::decode_npub(&npub)? })),
            Self::EncodeNote { event_id } => Ok(json!({ "note": utils::nip19::encode_note(&event_id)? })),
            Self::DecodeNote { note } => Ok(json!({ "event_id": utils::nip19::decode_note(&note)? })),
            Self::EncodeLnurl { url, q } => Ok(json!({ "lnurl": utils::lnurl::encode(&url, q)? })),
            Self::DecodeLnurl { lnurl } => Ok(json!({ "url": utils::lnurl::decode(&lnurl)? })),
            Self::VerifySignature {
                signature,
                pubkey,
                event_id,
            } => Ok(json!({ "valid": utils::nostr::verify_signature(&signature, &pubkey, &event_id) })),
            Self::ProfileAddress { profile } => {
                let profile: NostrProfile =
                    serde_json::from_str(&profile).map_err(|err| ResolverError::Format(err.to_string()))?;
                let address = profile
                    .payment_address()
                    .ok_or_else(|| ResolverError::Validation(String::from("profile has no lud16 or lud06")))?;
                let url = client.resolve_address(address)?;
                Ok(json!({
                    "name": profile.name(),
                    "display_name": profile.display_name(),
                    "nip05": profile.nip05(),
                    "address": address,
                    "url": url.as_str(),
                }))
            }
            Self::VerifyEvent { event } => {
                let event = NostrEvent::from_json(&event).map_err(|err| ResolverError::Format(err.to_string()))?;
                Ok(json!({
                    "id": utils::nostr::compute_event_id(&event),
                    "valid": utils::nostr::verify_event(&event),
                }))
            }
            Self::ValidateZap {
                zap_request,
                amount_msats,
            } => {
                let event = utils::nostr::validate_zap_request(&zap_request, amount_msats)
                    .map_err(|err| ResolverError::Validation(err.to_string()))?;
                Ok(json!({ "valid": true, "pubkey": event.pubkey }))
            }
        }
    }
}
