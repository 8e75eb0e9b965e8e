use xerror::codec::CodecError;

use crate::bech32;

pub const PREFIX: &str = "lnurl";

pub fn encode(base_url: &str, q: Option<String>) -> Result<String, CodecError> {
    let url = match q {
        Some(id) => format!("{base_url}?q={id}"),
        None => base_url.to_string(),
    };
    let validated_url = url::Url::parse(&url).map_err(|_| CodecError::Format)?.to_string();
    let symbols = bech32::convert_bits(validated_url.as_bytes(), 8, 5, true)?;
    bech32::encode(PREFIX, &symbols)
}

/// Decodes the url carried by an `lnurl1...` string without parsing it.
/// `verify_checksum` selects between the strict and the shape-only decoder.
pub fn decode_raw(encoded: &str, verify_checksum: bool) -> Result<String, CodecError> {
    let (hrp, symbols) = if verify_checksum {
        bech32::decode_verified(encoded)?
    } else {
        bech32::decode(encoded)?
    };
    if hrp != PREFIX {
        return Err(CodecError::HrpMismatch {
            expected: PREFIX.to_string(),
            got: hrp,
        });
    }
    let bytes = bech32::convert_bits(&symbols, 5, 8, false)?;
    String::from_utf8(bytes).map_err(|_| CodecError::Format)
}

pub fn decode(encoded: &str) -> Result<String, CodecError> {
    let str = decode_raw(encoded, true)?;
    let validated_url = url::Url::parse(&str).map_err(|_| CodecError::Format)?.to_string();
    Ok(validated_url)
}
