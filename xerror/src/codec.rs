use err_derive::Error;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error(display = "An Error has occured while decoding.")]
pub enum CodecError {
    #[error(display = "Malformed string shape.")]
    Format,
    #[error(display = "Invalid character {:?}.", _0)]
    Charset(char),
    #[error(display = "Invalid padding bits.")]
    Padding,
    #[error(display = "Symbol out of range for its bit width.")]
    InvalidSymbol,
    #[error(display = "Expected {} bytes, got {}.", expected, got)]
    Length { expected: usize, got: usize },
    #[error(display = "Expected prefix {:?}, got {:?}.", expected, got)]
    HrpMismatch { expected: String, got: String },
    #[error(display = "Checksum mismatch.")]
    Checksum,
}
