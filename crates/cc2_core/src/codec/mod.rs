//! Text codec for Case Clicker 2 save strings.
//!
//! A save is the JSON text of the game state, LZW-compressed over Latin-1
//! symbols, with every code written as a self-delimiting base-36 token.
//! Literal codes are `0..256`; learned phrases are numbered from
//! [`FIRST_PHRASE_CODE`] upward and never travel in the stream.
//!
//! ```
//! use cc2_core::codec::{decode, encode};
//!
//! let encoded = encode("A").unwrap();
//! assert_eq!(encoded, "1T");
//! assert_eq!(decode(&encoded).unwrap(), "A");
//! ```

mod alphabet;
mod error;
mod lzw;
mod token;

pub use alphabet::{DIGIT_TERMINATORS, digit_to_terminator, terminator_to_digit};
pub use error::{CodecError, CodecErrorCode};

/// Alias for an LZW code point.
pub type Code = u32;

/// First code assigned to a learned phrase.
pub const FIRST_PHRASE_CODE: Code = 256;

/// Encodes `text` into the game's save string format.
///
/// Fails with [`CodecErrorCode::EmptyInput`] for an empty string and with
/// [`CodecErrorCode::UnsupportedSymbol`] if any character is above U+00FF.
pub fn encode(text: &str) -> Result<String, CodecError> {
    if text.is_empty() {
        return Err(CodecError::new(
            CodecErrorCode::EmptyInput,
            "cannot encode an empty string",
        ));
    }

    let symbols = latin1_symbols(text)?;
    let codes = lzw::compress(&symbols);

    let mut out = String::with_capacity(codes.len() * 2);
    for &code in &codes {
        token::push_token(&mut out, code);
    }

    tracing::debug!(
        symbols = symbols.len(),
        codes = codes.len(),
        encoded_len = out.len(),
        "encoded save text"
    );
    Ok(out)
}

/// Decodes a save string produced by [`encode`] (or by the game) back into text.
pub fn decode(encoded: &str) -> Result<String, CodecError> {
    let codes = token::tokenize(encoded)?;
    let symbols = lzw::expand(&codes)?;

    tracing::debug!(
        codes = codes.len(),
        symbols = symbols.len(),
        "decoded save text"
    );
    Ok(symbols.into_iter().map(char::from).collect())
}

fn latin1_symbols(text: &str) -> Result<Vec<u8>, CodecError> {
    text.chars()
        .enumerate()
        .map(|(position, c)| {
            u8::try_from(c).map_err(|_| {
                CodecError::new(
                    CodecErrorCode::UnsupportedSymbol,
                    format!(
                        "character {c:?} (U+{:04X}) at position {position} is outside the Latin-1 range",
                        c as u32
                    ),
                )
            })
        })
        .collect()
}
