//! Self-delimiting text form of a code stream.
//!
//! Each code is written as a lowercase base-36 numeral whose final digit is
//! replaced by a terminator: letters are uppercased, decimal digits are mapped
//! through the punctuation table in [`super::alphabet`]. Continuation digits
//! are therefore always `[a-z0-9]` and terminators never are.

use super::Code;
use super::alphabet::{digit_to_terminator, terminator_to_digit};
use super::error::{CodecError, CodecErrorCode};

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// u32::MAX is "1z141z3" in base 36.
const MAX_TOKEN_LEN: usize = 7;

pub fn push_token(out: &mut String, code: Code) {
    let mut digits = [0u8; MAX_TOKEN_LEN];
    let mut len = 0;
    let mut rest = code;
    loop {
        digits[len] = (rest % 36) as u8;
        len += 1;
        rest /= 36;
        if rest == 0 {
            break;
        }
    }

    // digits[0] is the least significant digit and becomes the terminator.
    for &digit in digits[1..len].iter().rev() {
        out.push(BASE36_DIGITS[digit as usize] as char);
    }
    let last = BASE36_DIGITS[digits[0] as usize] as char;
    out.push(digit_to_terminator(last).unwrap_or_else(|| last.to_ascii_uppercase()));
}

pub fn tokenize(encoded: &str) -> Result<Vec<Code>, CodecError> {
    let mut codes = Vec::new();
    let mut buffer = String::with_capacity(MAX_TOKEN_LEN);

    for (offset, c) in encoded.char_indices() {
        let terminal_digit = if c.is_ascii_uppercase() {
            Some(c.to_ascii_lowercase())
        } else {
            terminator_to_digit(c)
        };

        match terminal_digit {
            Some(digit) => {
                buffer.push(digit);
                codes.push(parse_token(&buffer, offset)?);
                buffer.clear();
            }
            None if c.is_ascii_lowercase() || c.is_ascii_digit() => buffer.push(c),
            None => {
                return Err(CodecError::new(
                    CodecErrorCode::MalformedToken,
                    format!("unexpected character {c:?} at byte {offset}"),
                ));
            }
        }
    }

    if !buffer.is_empty() {
        return Err(CodecError::new(
            CodecErrorCode::MalformedToken,
            format!(
                "stream ends inside unterminated token {buffer:?} at byte {}",
                encoded.len()
            ),
        ));
    }

    Ok(codes)
}

fn parse_token(buffer: &str, offset: usize) -> Result<Code, CodecError> {
    Code::from_str_radix(buffer, 36).map_err(|e| {
        CodecError::new(
            CodecErrorCode::MalformedToken,
            format!("token {buffer:?} ending at byte {offset} is not a valid code: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::{push_token, tokenize};
    use crate::codec::error::CodecErrorCode;

    fn token(code: u32) -> String {
        let mut out = String::new();
        push_token(&mut out, code);
        out
    }

    #[test]
    fn single_digit_codes_are_bare_terminators() {
        assert_eq!(token(0), "=");
        assert_eq!(token(9), "+");
        assert_eq!(token(7), "\\");
        assert_eq!(token(10), "A");
        assert_eq!(token(35), "Z");
    }

    #[test]
    fn multi_digit_codes_keep_lowercase_prefix() {
        // 65 = "1t", 256 = "74", 1295 = "zz", 1296 = "100"
        assert_eq!(token(65), "1T");
        assert_eq!(token(256), "7%");
        assert_eq!(token(1295), "zZ");
        assert_eq!(token(1296), "10=");
        assert_eq!(token(u32::MAX), "1z141z$");
    }

    #[test]
    fn tokenize_splits_on_terminators() {
        assert_eq!(tokenize("1T7%=zZ10=").expect("stream should parse"), vec![
            65, 256, 0, 1295, 1296
        ]);
        assert_eq!(tokenize("").expect("empty stream tokenizes"), Vec::<u32>::new());
    }

    #[test]
    fn tokenize_rejects_unterminated_tail() {
        let err = tokenize("1T1").expect_err("dangling continuation should fail");
        assert_eq!(err.code, CodecErrorCode::MalformedToken);
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn tokenize_rejects_foreign_characters() {
        let err = tokenize("1T {").expect_err("space is not part of the alphabet");
        assert_eq!(err.code, CodecErrorCode::MalformedToken);
        assert!(err.message.contains("byte 2"));
    }

    #[test]
    fn tokenize_rejects_codes_wider_than_u32() {
        let err = tokenize("zzzzzzzzZ").expect_err("overflowing token should fail");
        assert_eq!(err.code, CodecErrorCode::MalformedToken);
    }
}
