/// Terminator punctuation for each decimal digit, indexed by digit value.
///
/// None of these characters may ever appear in `[a-zA-Z0-9]`; the tokenizer
/// relies on that to find token boundaries.
pub const DIGIT_TERMINATORS: [char; 10] = ['=', '!', '?', '$', '%', '&', '/', '\\', '-', '+'];

pub fn digit_to_terminator(digit: char) -> Option<char> {
    let value = digit.to_digit(10)?;
    Some(DIGIT_TERMINATORS[value as usize])
}

pub fn terminator_to_digit(terminator: char) -> Option<char> {
    DIGIT_TERMINATORS
        .iter()
        .position(|&c| c == terminator)
        .and_then(|index| char::from_digit(index as u32, 10))
}
