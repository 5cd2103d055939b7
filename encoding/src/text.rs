//! Fixed length text fields.
//!
//! Text in ADAC headers is stored in slots of a fixed length,
//! padded at the end with NUL characters.
//! Bytes outside of the ASCII range are interpreted as ISO 8859-1,
//! which is what the acquisition stations write in practice.

use encoding::all::ISO_8859_1;
use encoding::{DecoderTrap, EncoderTrap, Encoding};

/// Decode a fixed length text slot,
/// stripping trailing NUL characters.
///
/// Interior garbage after the first NUL is preserved as is.
pub fn decode_text(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map(|i| i + 1)
        .unwrap_or(0);
    ISO_8859_1
        .decode(&bytes[..end], DecoderTrap::Replace)
        .unwrap_or_else(|_| String::from_utf8_lossy(&bytes[..end]).into_owned())
}

/// Encode text in ISO 8859-1, without any padding.
///
/// Characters outside of the character set are replaced.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    ISO_8859_1
        .encode(text, EncoderTrap::Replace)
        .unwrap_or_else(|_| text.bytes().collect())
}

/// Encode text into a slot of exactly `len` bytes,
/// truncating or padding with NUL characters as needed.
pub fn encode_text(text: &str, len: usize) -> Vec<u8> {
    let mut bytes = encode_latin1(text);
    bytes.resize(len, 0);
    bytes
}
