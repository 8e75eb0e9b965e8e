//! Bech32 (BIP-173) checksum codec and the bit regrouping it is built on.
//!
//! `decode` only checks the shape of a string and strips the trailing six
//! checksum symbols. `decode_verified` additionally recomputes the checksum
//! and should be preferred for anything arriving from outside.

use bech32::u5;
use xerror::codec::CodecError;

pub const SEPARATOR: char = '1';
pub const CHECKSUM_LEN: usize = 6;
pub const MIN_LENGTH: usize = 8;
/// LNURLs routinely exceed the 90 characters of BIP-173.
pub const MAX_LENGTH: usize = 2048;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];
const FINAL_CONSTANT: u32 = 1;

/// Regroups `input` symbols of `from_bits` width into symbols of `to_bits` width.
///
/// With `pad` the last partial group is left aligned and emitted. Without it
/// the leftover bits must be fewer than `from_bits` and all zero.
pub fn convert_bits(input: &[u8], from_bits: u32, to_bits: u32, pad: bool) -> Result<Vec<u8>, CodecError> {
    // bech32 panics on widths outside 1..=8
    if !(1..=8).contains(&from_bits) || !(1..=8).contains(&to_bits) {
        return Err(CodecError::InvalidSymbol);
    }
    bech32::convert_bits(input, from_bits, to_bits, pad).map_err(|err| match err {
        bech32::Error::InvalidPadding => CodecError::Padding,
        _ => CodecError::InvalidSymbol,
    })
}

fn polymod(values: impl IntoIterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for value in values {
        let top = chk >> 25;
        chk = ((chk & 0x1ffffff) << 5) ^ value as u32;
        for (i, generator) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= generator;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut expanded = Vec::with_capacity(bytes.len() * 2 + 1);
    expanded.extend(bytes.iter().map(|b| b >> 5));
    expanded.push(0);
    expanded.extend(bytes.iter().map(|b| b & 31));
    expanded
}

fn verify_checksum(hrp: &str, symbols: &[u8]) -> bool {
    polymod(hrp_expand(hrp).into_iter().chain(symbols.iter().copied())) == FINAL_CONSTANT
}

fn is_valid_hrp_char(c: char) -> bool {
    c.is_ascii() && (33..=126).contains(&(c as u8))
}

/// Encodes 5-bit `data` under `hrp`. The prefix is lower-cased first.
///
/// Anything that would come out longer than [`MAX_LENGTH`] is refused, so
/// every encoded string decodes again.
pub fn encode(hrp: &str, data: &[u8]) -> Result<String, CodecError> {
    if hrp.is_empty() || !hrp.chars().all(is_valid_hrp_char) {
        return Err(CodecError::Format);
    }
    if hrp.len() + 1 + data.len() + CHECKSUM_LEN > MAX_LENGTH {
        return Err(CodecError::Format);
    }
    let symbols = data
        .iter()
        .map(|symbol| u5::try_from_u8(*symbol).map_err(|_| CodecError::InvalidSymbol))
        .collect::<Result<Vec<_>, _>>()?;

    bech32::encode(&hrp.to_ascii_lowercase(), symbols).map_err(|_| CodecError::Format)
}

/// Splits `encoded` into its prefix and every payload symbol, checksum included.
fn split(encoded: &str) -> Result<(String, Vec<u8>), CodecError> {
    if encoded.len() < MIN_LENGTH || encoded.len() > MAX_LENGTH {
        return Err(CodecError::Format);
    }

    let has_lower = encoded.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = encoded.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(CodecError::Format);
    }
    let encoded = encoded.to_ascii_lowercase();

    let separator = encoded.rfind(SEPARATOR).ok_or(CodecError::Format)?;
    if separator < 1 || encoded.len() - separator - 1 < CHECKSUM_LEN {
        return Err(CodecError::Format);
    }

    let (hrp, payload) = (&encoded[..separator], &encoded[separator + 1..]);
    if !hrp.chars().all(is_valid_hrp_char) {
        return Err(CodecError::Format);
    }

    let symbols = payload
        .chars()
        .map(|c| {
            CHARSET
                .iter()
                .position(|&x| x as char == c)
                .map(|index| index as u8)
                .ok_or(CodecError::Charset(c))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((hrp.to_string(), symbols))
}

/// Decodes the shape of `encoded` without looking at its checksum.
pub fn decode(encoded: &str) -> Result<(String, Vec<u8>), CodecError> {
    let (hrp, mut symbols) = split(encoded)?;
    symbols.truncate(symbols.len() - CHECKSUM_LEN);
    Ok((hrp, symbols))
}

/// Like [`decode`] but rejects strings whose checksum does not match.
pub fn decode_verified(encoded: &str) -> Result<(String, Vec<u8>), CodecError> {
    let (hrp, mut symbols) = split(encoded)?;
    if !verify_checksum(&hrp, &symbols) {
        return Err(CodecError::Checksum);
    }
    symbols.truncate(symbols.len() - CHECKSUM_LEN);
    Ok((hrp, symbols))
}
