use std::io;

use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_json::ser::Formatter;

use super::error::{CoreError, CoreErrorCode};

/// Compact JSON formatter that writes every character above U+00FF as a
/// `\uXXXX` escape, so the output only contains symbols the codec accepts.
#[derive(Debug, Default, Clone, Copy)]
struct Latin1Formatter;

impl Formatter for Latin1Formatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (offset, c) in fragment.char_indices() {
            if (c as u32) <= 0xFF {
                continue;
            }
            writer.write_all(fragment[start..offset].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = offset + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

pub(crate) fn to_latin1_json(value: &JsonValue) -> Result<String, CoreError> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, Latin1Formatter);
    value.serialize(&mut serializer).map_err(serialize_error)?;
    String::from_utf8(out).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Serialize,
            format!("serialized JSON is not valid UTF-8: {e}"),
        )
    })
}

pub(crate) fn to_compact_json(value: &JsonValue) -> Result<String, CoreError> {
    serde_json::to_string(value).map_err(serialize_error)
}

pub(crate) fn to_pretty_json(value: &JsonValue) -> Result<String, CoreError> {
    serde_json::to_string_pretty(value).map_err(serialize_error)
}

fn serialize_error(err: serde_json::Error) -> CoreError {
    CoreError::new(
        CoreErrorCode::Serialize,
        format!("failed to serialize save JSON: {err}"),
    )
}
