use serde::{Deserialize, Serialize};

pub const ZAP_REQUEST_KIND: u64 = 9734;

/// NIP-01 event as it travels on the wire.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NostrEvent {
    pub id: String,
    pub pubkey: String,
    pub created_at: u64,
    pub kind: u64,
    #[serde(default)]
    pub tags: Vec<Vec<String>>,
    #[serde(default)]
    pub content: String,
    pub sig: String,
}

impl NostrEvent {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn as_json(&self) -> String {
        // Serializing plain strings and integers cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Tags whose first element equals `name`, without the name itself.
    pub fn tag_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a [String]> + 'a {
        self.tags
            .iter()
            .filter(move |tag| tag.first().map(|n| n == name).unwrap_or(false))
            .map(|tag| &tag[1..])
    }
}

/// Content of a kind 0 metadata event.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct NostrProfile {
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    lud06: Option<String>,
    #[serde(default)]
    nip05: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    about: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    lud16: Option<String>,
}

impl NostrProfile {
    pub fn name(&self) -> &Option<String> {
        &self.name
    }

    pub fn display_name(&self) -> &Option<String> {
        &self.display_name
    }

    pub fn nip05(&self) -> &Option<String> {
        &self.nip05
    }

    /// Address to zap this profile with. Lightning addresses win over
    /// encoded lnurls.
    pub fn payment_address(&self) -> Option<&str> {
        self.lud16
            .as_deref()
            .filter(|address| !address.trim().is_empty())
            .or_else(|| self.lud06.as_deref().filter(|lnurl| !lnurl.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_address_prefers_lud16() {
        let profile: NostrProfile =
            serde_json::from_str(r#"{"lud06": "lnurl1dp68gurn8ghj7", "lud16": "alice@example.com"}"#).unwrap();
        assert_eq!(profile.payment_address(), Some("alice@example.com"));

        let profile: NostrProfile = serde_json::from_str(r#"{"lud06": "lnurl1dp68gurn8ghj7", "lud16": ""}"#).unwrap();
        assert_eq!(profile.payment_address(), Some("lnurl1dp68gurn8ghj7"));

        let profile = NostrProfile::default();
        assert_eq!(profile.payment_address(), None);
    }

    #[test]
    fn test_tag_values() {
        let event = NostrEvent {
            id: String::new(),
            pubkey: String::new(),
            created_at: 0,
            kind: ZAP_REQUEST_KIND,
            tags: vec![
                vec!["p".to_string(), "ab".to_string()],
                vec!["relays".to_string(), "wss://a".to_string(), "wss://b".to_string()],
            ],
            content: String::new(),
            sig: String::new(),
        };
        let relays = event.tag_values("relays").next().unwrap();
        assert_eq!(relays, ["wss://a".to_string(), "wss://b".to_string()]);
        assert_eq!(event.tag_values("e").count(), 0);
    }
}
