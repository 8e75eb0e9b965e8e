use xerror::codec::CodecError;

use crate::bech32;

pub const NPUB_PREFIX: &str = "npub";
pub const NOTE_PREFIX: &str = "note";
pub const IDENTIFIER_LEN: usize = 32;

/// Renders a 32-byte hex value as a bech32 string under `prefix`.
pub fn encode_identifier(hex_bytes: &str, prefix: &str) -> Result<String, CodecError> {
    let bytes = hex::decode(hex_bytes).map_err(|_| CodecError::Format)?;
    if bytes.len() != IDENTIFIER_LEN {
        return Err(CodecError::Length {
            expected: IDENTIFIER_LEN,
            got: bytes.len(),
        });
    }
    let symbols = bech32::convert_bits(&bytes, 8, 5, true)?;
    bech32::encode(prefix, &symbols)
}

/// Inverse of [`encode_identifier`], returning lowercase hex.
pub fn decode_identifier(encoded: &str, prefix: &str) -> Result<String, CodecError> {
    let (hrp, symbols) = bech32::decode_verified(encoded)?;
    if !hrp.eq_ignore_ascii_case(prefix) {
        return Err(CodecError::HrpMismatch {
            expected: prefix.to_string(),
            got: hrp,
        });
    }
    let bytes = bech32::convert_bits(&symbols, 5, 8, false)?;
    if bytes.len() != IDENTIFIER_LEN {
        return Err(CodecError::Length {
            expected: IDENTIFIER_LEN,
            got: bytes.len(),
        });
    }
    Ok(hex::encode(bytes))
}

pub fn encode_npub(pubkey_hex: &str) -> Result<String, CodecError> {
    encode_identifier(pubkey_hex, NPUB_PREFIX)
}

pub fn encode_note(event_id_hex: &str) -> Result<String, CodecError> {
    encode_identifier(event_id_hex, NOTE_PREFIX)
}

pub fn decode_npub(npub: &str) -> Result<String, CodecError> {
    decode_identifier(npub, NPUB_PREFIX)
}

pub fn decode_note(note: &str) -> Result<String, CodecError> {
    decode_identifier(note, NOTE_PREFIX)
}
