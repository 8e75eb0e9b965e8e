use utils::user::check_username_valid;
use xerror::resolver::ResolverError;

pub const LIGHTNING_URI_SCHEME: &str = "lightning:";
pub const LNURL_PREFIX: &str = "lnurl";
pub const LNURLP_SCHEME: &str = "lnurlp://";
pub const WELL_KNOWN_PATH: &str = ".well-known/lnurlp";

/// A payment address as typed by a user, before any network access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentAddress {
    /// `username@domain`, username already lower-cased.
    LightningAddress { username: String, domain: String },
    /// Bech32 `lnurl1...` string.
    Lnurl(String),
    /// Scheme form `lnurlp://domain/path`, stored as the https url it stands for.
    LnurlpUri(String),
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}

/// The address without surrounding whitespace and `lightning:` scheme.
pub fn strip_uri_scheme(address: &str) -> &str {
    let trimmed = address.trim();
    strip_prefix_ignore_case(trimmed, LIGHTNING_URI_SCHEME).unwrap_or(trimmed)
}

fn format_error(address: &str, reason: &str) -> ResolverError {
    ResolverError::Format(format!("{:?} {}", address, reason))
}

impl PaymentAddress {
    pub fn parse(address: &str) -> Result<Self, ResolverError> {
        let trimmed = strip_uri_scheme(address);

        if trimmed.contains('@') {
            return Self::parse_lightning_address(trimmed);
        }

        if let Some(rest) = strip_prefix_ignore_case(trimmed, LNURLP_SCHEME) {
            if rest.is_empty() {
                return Err(format_error(address, "has no host"));
            }
            return Ok(PaymentAddress::LnurlpUri(format!("https://{}", rest)));
        }

        if strip_prefix_ignore_case(trimmed, LNURL_PREFIX).is_some() {
            return Ok(PaymentAddress::Lnurl(trimmed.to_string()));
        }

        Err(format_error(address, "is neither a lightning address nor an lnurl"))
    }

    fn parse_lightning_address(address: &str) -> Result<Self, ResolverError> {
        let (username, domain) = address
            .split_once('@')
            .ok_or_else(|| format_error(address, "has no @"))?;
        if username.is_empty() || domain.is_empty() {
            return Err(format_error(address, "has an empty part"));
        }

        let username = username.to_lowercase();
        if !check_username_valid(&username) {
            return Err(format_error(address, "has invalid characters in its name"));
        }
        if domain
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@' | '\\'))
        {
            return Err(format_error(address, "has an invalid domain"));
        }

        Ok(PaymentAddress::LightningAddress {
            username,
            domain: domain.to_string(),
        })
    }

    /// Url to fetch the payment endpoint from. Not yet checked by the guard.
    pub fn candidate_url(&self, verify_checksum: bool) -> Result<String, ResolverError> {
        match self {
            PaymentAddress::LightningAddress { username, domain } => {
                Ok(format!("https://{}/{}/{}", domain, WELL_KNOWN_PATH, username))
            }
            PaymentAddress::Lnurl(encoded) => Ok(utils::lnurl::decode_raw(encoded, verify_checksum)?),
            PaymentAddress::LnurlpUri(url) => Ok(url.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lightning_address_url() {
        let address = PaymentAddress::parse("alice@example.com").unwrap();
        assert_eq!(
            address.candidate_url(true).unwrap(),
            "https://example.com/.well-known/lnurlp/alice"
        );
    }

    #[test]
    fn test_lightning_address_lowercases_name_only() {
        let address = PaymentAddress::parse(" lightning:Alice@Example.com ").unwrap();
        assert_eq!(
            address,
            PaymentAddress::LightningAddress {
                username: "alice".to_string(),
                domain: "Example.com".to_string()
            }
        );
    }

    #[test]
    fn test_splits_on_first_at() {
        assert!(matches!(
            PaymentAddress::parse("alice@example.com@evil.com"),
            Err(ResolverError::Format(_))
        ));
    }

    #[test]
    fn test_malformed_addresses() {
        for address in [
            "@example.com",
            "alice@",
            "alice",
            "",
            "al ice@example.com",
            "alice@example.com/x?",
            "lnurlp://",
        ] {
            assert!(
                matches!(PaymentAddress::parse(address), Err(ResolverError::Format(_))),
                "{:?} should be rejected",
                address
            );
        }
    }

    #[test]
    fn test_strip_uri_scheme() {
        assert_eq!(strip_uri_scheme(" LIGHTNING:alice@example.com "), "alice@example.com");
        assert_eq!(strip_uri_scheme("alice@example.com"), "alice@example.com");
        assert_eq!(strip_uri_scheme("light"), "light");
    }

    #[test]
    fn test_lnurl_forms() {
        let encoded = concat!(
            "LNURL1DP68GURN8GHJ7UM9WFMXJCM99E3K7MF0V9CXJ0M385EKVCENXC6R2C35XVUKXEFCV5MKVV34X5EKZD3",
            "EV56NYD3HXQURZEPEXEJXXEPNXSCRVWFNV9NXZCN9XQ6XYEFHVGCXXCMYXYMNSERXFQ5FNS"
        );
        let address = PaymentAddress::parse(&format!("lightning:{}", encoded)).unwrap();
        assert_eq!(address, PaymentAddress::Lnurl(encoded.to_string()));
        assert_eq!(
            address.candidate_url(true).unwrap(),
            "https://service.com/api?q=3fc3645b439ce8e7f2553a69e5267081d96dcd340693afabe04be7b0ccd178df"
        );

        let address = PaymentAddress::parse("lnurlp://service.com/pay/bob").unwrap();
        assert_eq!(address.candidate_url(true).unwrap(), "https://service.com/pay/bob");
    }
}
