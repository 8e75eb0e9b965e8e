pub mod codec;
pub mod nostr;
pub mod resolver;
