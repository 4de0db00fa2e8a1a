use cc2_core::codec::{self, CodecErrorCode};
use cc2_core::core_api::{CoreError, CoreErrorCode, Engine, SaveFormat};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WebImportOptions {
    pub format_hint: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WebExportOptions {
    pub emit: Option<String>,
    /// Indent JSON output. Defaults to true; ignored for encoded output.
    pub pretty: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
struct ImportedSave {
    format: SaveFormat,
    document: serde_json::Value,
}

#[derive(Debug, Clone)]
struct WebError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct WebErrorPayload {
    code: String,
    message: String,
}

impl WebError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_js_value(&self) -> JsValue {
        let payload = WebErrorPayload {
            code: self.code.to_string(),
            message: self.message.clone(),
        };
        serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| {
            JsValue::from_str(&format!("{}: {}", payload.code, payload.message))
        })
    }
}

impl From<CoreError> for WebError {
    fn from(err: CoreError) -> Self {
        let code = match err.code {
            CoreErrorCode::Parse => "parse_failed",
            CoreErrorCode::Codec(CodecErrorCode::EmptyInput | CodecErrorCode::UnsupportedSymbol) => {
                "encode_failed"
            }
            CoreErrorCode::Codec(_) => "decode_failed",
            CoreErrorCode::Serialize => "render_failed",
            CoreErrorCode::UnsupportedOperation => "unsupported_operation",
        };
        Self::new(code, err.to_string())
    }
}

#[wasm_bindgen]
pub fn encode_save(text: &str) -> Result<String, JsValue> {
    codec::encode(text).map_err(|err| WebError::new("encode_failed", err.to_string()).to_js_value())
}

#[wasm_bindgen]
pub fn decode_save(encoded: &str) -> Result<String, JsValue> {
    codec::decode(encoded.trim())
        .map_err(|err| WebError::new("decode_failed", err.to_string()).to_js_value())
}

/// Imports pasted or uploaded save text, returning `{ format, document }`.
#[wasm_bindgen]
pub fn import_save(text: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let parsed_options: WebImportOptions =
        parse_options(options).map_err(|err| err.to_js_value())?;
    let imported = import_save_impl(text, &parsed_options).map_err(|err| err.to_js_value())?;
    imported
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| {
            WebError::new(
                "render_failed",
                format!("failed to convert imported save: {err}"),
            )
            .to_js_value()
        })
}

/// Exports an edited save document as the game string or as JSON.
#[wasm_bindgen]
pub fn export_save(document: JsValue, options: JsValue) -> Result<String, JsValue> {
    let parsed_options: WebExportOptions =
        parse_options(options).map_err(|err| err.to_js_value())?;
    let document: serde_json::Value = serde_wasm_bindgen::from_value(document).map_err(|err| {
        WebError::new(
            "invalid_document",
            format!("Failed to read save document: {err}"),
        )
        .to_js_value()
    })?;
    export_save_impl(&document, &parsed_options).map_err(|err| err.to_js_value())
}

fn import_save_impl(text: &str, options: &WebImportOptions) -> Result<ImportedSave, WebError> {
    if text.trim().is_empty() {
        return Err(WebError::new(
            "unsupported_file",
            "The save data is empty. Paste a save string or upload a save file.",
        ));
    }

    let hint = parse_format_hint(options.format_hint.as_deref())?;
    let session = Engine::new().open_str(text, hint)?;
    Ok(ImportedSave {
        format: session.format(),
        document: session.document().clone(),
    })
}

fn export_save_impl(
    document: &serde_json::Value,
    options: &WebExportOptions,
) -> Result<String, WebError> {
    let emit = parse_format_hint(options.emit.as_deref())?.unwrap_or(SaveFormat::Encoded);
    let text = serde_json::to_string(document).map_err(|err| {
        WebError::new(
            "invalid_document",
            format!("Failed to serialize save document: {err}"),
        )
    })?;
    let session = Engine::new().open_str(&text, Some(SaveFormat::Json))?;

    let rendered = match emit {
        SaveFormat::Encoded => session.to_encoded()?,
        SaveFormat::Json if options.pretty.unwrap_or(true) => session.to_json_pretty()?,
        SaveFormat::Json => session.to_json_compact()?,
    };
    Ok(rendered)
}

fn parse_options<T>(options: JsValue) -> Result<T, WebError>
where
    T: Default + for<'de> Deserialize<'de>,
{
    if options.is_null() || options.is_undefined() {
        return Ok(T::default());
    }

    serde_wasm_bindgen::from_value(options).map_err(|err| {
        WebError::new(
            "invalid_options",
            format!("Failed to parse options: {err}"),
        )
    })
}

fn parse_format_hint(raw_hint: Option<&str>) -> Result<Option<SaveFormat>, WebError> {
    let Some(raw_hint) = raw_hint else {
        return Ok(None);
    };

    let normalized = raw_hint.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Ok(None);
    }

    match normalized.as_str() {
        "json" => Ok(Some(SaveFormat::Json)),
        "encoded" | "save" | "game" => Ok(Some(SaveFormat::Encoded)),
        _ => Err(WebError::new(
            "invalid_options",
            format!("Invalid format '{raw_hint}'. Expected one of: json, encoded"),
        )),
    }
}
