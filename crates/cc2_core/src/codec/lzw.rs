use std::collections::HashMap;

use super::error::{CodecError, CodecErrorCode};
use super::{Code, FIRST_PHRASE_CODE};

/// Encoder-side dictionary.
///
/// A phrase is keyed by the code of its prefix and its final symbol. Literal
/// codes and phrase codes never overlap because symbols are limited to
/// `0..FIRST_PHRASE_CODE`, so the pair identifies the phrase exactly.
#[derive(Debug)]
struct PhraseTable {
    links: HashMap<(Code, u8), Code>,
    next_code: Code,
}

impl PhraseTable {
    fn new() -> Self {
        Self {
            links: HashMap::new(),
            next_code: FIRST_PHRASE_CODE,
        }
    }

    fn extend(&self, prefix: Code, symbol: u8) -> Option<Code> {
        self.links.get(&(prefix, symbol)).copied()
    }

    fn learn(&mut self, prefix: Code, symbol: u8) -> Code {
        let code = self.next_code;
        self.links.insert((prefix, symbol), code);
        self.next_code += 1;
        code
    }
}

/// Compresses Latin-1 symbols into LZW codes. Returns no codes for empty input.
pub fn compress(symbols: &[u8]) -> Vec<Code> {
    let Some((&first, rest)) = symbols.split_first() else {
        return Vec::new();
    };

    let mut table = PhraseTable::new();
    let mut codes = Vec::new();
    let mut current = Code::from(first);

    for &symbol in rest {
        match table.extend(current, symbol) {
            Some(code) => current = code,
            None => {
                codes.push(current);
                table.learn(current, symbol);
                current = Code::from(symbol);
            }
        }
    }
    codes.push(current);

    codes
}

/// Expands LZW codes back into Latin-1 symbols.
pub fn expand(codes: &[Code]) -> Result<Vec<u8>, CodecError> {
    let Some((&first, rest)) = codes.split_first() else {
        return Err(CodecError::new(
            CodecErrorCode::EmptyStream,
            "encoded stream contains no codes",
        ));
    };
    let Some(first_symbol) = literal(first) else {
        return Err(CodecError::new(
            CodecErrorCode::InvalidFirstCode,
            format!("stream starts with phrase code {first}; the first code must be a literal"),
        ));
    };

    // phrases[i] holds the phrase for code FIRST_PHRASE_CODE + i.
    let mut phrases: Vec<Vec<u8>> = Vec::new();
    let mut output = vec![first_symbol];
    let mut previous = vec![first_symbol];

    for (index, &code) in rest.iter().enumerate() {
        let phrase = if let Some(symbol) = literal(code) {
            vec![symbol]
        } else {
            let slot = (code - FIRST_PHRASE_CODE) as usize;
            match slot.cmp(&phrases.len()) {
                std::cmp::Ordering::Less => phrases[slot].clone(),
                // The code names the entry this very step defines.
                std::cmp::Ordering::Equal => {
                    let mut phrase = previous.clone();
                    phrase.push(previous[0]);
                    phrase
                }
                std::cmp::Ordering::Greater => {
                    return Err(CodecError::new(
                        CodecErrorCode::UnknownBackReference,
                        format!(
                            "code {code} at position {} references an entry that is not defined yet (next entry is {})",
                            index + 1,
                            FIRST_PHRASE_CODE as usize + phrases.len()
                        ),
                    ));
                }
            }
        };

        output.extend_from_slice(&phrase);
        let mut learned = previous;
        learned.push(phrase[0]);
        phrases.push(learned);
        previous = phrase;
    }

    Ok(output)
}

fn literal(code: Code) -> Option<u8> {
    u8::try_from(code).ok()
}
