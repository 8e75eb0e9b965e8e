pub mod bech32;
pub mod config;
pub mod lnurl;
pub mod nip19;
pub mod nostr;
pub mod user;
pub mod xlogging;
