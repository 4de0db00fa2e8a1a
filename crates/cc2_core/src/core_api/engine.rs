use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

use crate::codec;

use super::error::{CoreError, CoreErrorCode};
use super::json::{to_compact_json, to_latin1_json, to_pretty_json};
use super::types::{SaveFormat, Snapshot};

const INVENTORY_KEY: &str = "inventory";
const DISCOVERED_KEY: &str = "discoveredItems";
const STATS_KEY: &str = "stats";
const UPGRADES_KEY: &str = "upgrades";
const ITEM_NAME_SEPARATOR: &str = " | ";

const MAX_VALUE: i64 = i32::MAX as i64;

const MAXED_TOP_LEVEL: [&str; 4] = ["money", "tickets", "tokens", "xp"];

const UNLOCK_FLAGS: [&str; 5] = [
    "unlockCollections",
    "unlockStickers",
    "unlockClickEffect2x",
    "unlockClickEffect4x",
    "unlockClickEffect7x",
];

const MAXED_STATS: [&str; 13] = [
    "earned_passive",
    "time_played",
    "total_winnings",
    "earned_cash",
    "earnings_from_clicks",
    "earned_xp",
    "xp_from_clicks",
    "clicks",
    "items_discovered",
    "skins_discovered",
    "stickers_discovered",
    "opened_cases",
    "opened_rarities_2",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

#[derive(Debug, Clone)]
pub struct Session {
    format: SaveFormat,
    original: String,
    document: JsonValue,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Imports a save from either plain JSON or the encoded game format.
    ///
    /// Without a hint, plain JSON is tried first and the codec second.
    pub fn open_str(&self, text: &str, hint: Option<SaveFormat>) -> Result<Session, CoreError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CoreError::new(CoreErrorCode::Parse, "save data is empty"));
        }

        let (format, document) = match hint {
            Some(SaveFormat::Json) => (SaveFormat::Json, parse_json(trimmed)?),
            Some(SaveFormat::Encoded) => (SaveFormat::Encoded, parse_encoded(trimmed)?),
            None => match parse_json(trimmed) {
                Ok(document) => (SaveFormat::Json, document),
                Err(json_err) => match parse_encoded(trimmed) {
                    Ok(document) => (SaveFormat::Encoded, document),
                    Err(codec_err) => {
                        return Err(CoreError::new(
                            CoreErrorCode::Parse,
                            format!(
                                "save data could not be parsed: as JSON: {}; as encoded save: {}",
                                json_err.message, codec_err
                            ),
                        ));
                    }
                },
            },
        };

        tracing::debug!(%format, input_len = trimmed.len(), "imported save");
        Ok(Session {
            format,
            original: trimmed.to_string(),
            document,
        })
    }
}

impl Session {
    pub fn format(&self) -> SaveFormat {
        self.format
    }

    pub fn document(&self) -> &JsonValue {
        &self.document
    }

    pub fn snapshot(&self) -> Snapshot {
        let int_field = |key: &str| {
            self.document
                .get(key)
                .and_then(JsonValue::as_i64)
                .unwrap_or(0)
        };
        Snapshot {
            format: self.format,
            money: int_field("money"),
            tickets: int_field("tickets"),
            tokens: int_field("tokens"),
            xp: int_field("xp"),
            inventory_count: self.inventory().len(),
            discovered_count: self.discovered_items().len(),
        }
    }

    /// Reads the number at a dot-separated path such as `stats.clicks`.
    pub fn get_number(&self, path: &str) -> Result<JsonNumber, CoreError> {
        let mut current = &self.document;
        for segment in path_segments(path)? {
            current = current
                .as_object()
                .and_then(|object| object.get(segment))
                .ok_or_else(|| missing_field(path))?;
        }
        match current {
            JsonValue::Number(number) => Ok(number.clone()),
            _ => Err(not_a_number(path)),
        }
    }

    /// Overwrites an existing numeric field. New fields are never created.
    pub fn set_number(&mut self, path: &str, value: i64) -> Result<(), CoreError> {
        let mut current = &mut self.document;
        for segment in path_segments(path)? {
            current = current
                .as_object_mut()
                .and_then(|object| object.get_mut(segment))
                .ok_or_else(|| missing_field(path))?;
        }
        if !current.is_number() {
            return Err(not_a_number(path));
        }
        *current = JsonValue::from(value);
        Ok(())
    }

    pub fn inventory(&self) -> Vec<String> {
        self.string_list(INVENTORY_KEY)
    }

    pub fn discovered_items(&self) -> Vec<String> {
        self.string_list(DISCOVERED_KEY)
    }

    /// Adds an item to the inventory and records its skin name as discovered.
    ///
    /// Returns `true` when the discovered list grew as well.
    pub fn add_inventory_item(&mut self, item: &str) -> Result<bool, CoreError> {
        let item = item.trim();
        if item.is_empty() {
            return Err(CoreError::new(
                CoreErrorCode::UnsupportedOperation,
                "inventory item name is empty",
            ));
        }

        let inventory = self.string_list_mut(INVENTORY_KEY)?;
        if inventory.iter().any(|entry| entry.as_str() == Some(item)) {
            return Err(CoreError::new(
                CoreErrorCode::UnsupportedOperation,
                format!("'{item}' is already in the inventory"),
            ));
        }
        inventory.push(JsonValue::from(item));

        let discovered_name = discovered_name(item);
        let discovered = self.string_list_mut(DISCOVERED_KEY)?;
        if discovered
            .iter()
            .any(|entry| entry.as_str() == Some(discovered_name))
        {
            return Ok(false);
        }
        discovered.push(JsonValue::from(discovered_name));
        Ok(true)
    }

    pub fn remove_inventory_item(&mut self, index: usize) -> Result<String, CoreError> {
        let inventory = self.string_list_mut(INVENTORY_KEY)?;
        if index >= inventory.len() {
            return Err(CoreError::new(
                CoreErrorCode::UnsupportedOperation,
                format!(
                    "inventory index {index} is out of range (inventory has {} items)",
                    inventory.len()
                ),
            ));
        }
        let removed = inventory.remove(index);
        Ok(removed
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| removed.to_string()))
    }

    /// Sets currencies, upgrades, and stat counters to their maximum values.
    ///
    /// Unlock flags are set to 1 and `achievements_completed` is left alone.
    pub fn max_stats(&mut self) -> Result<(), CoreError> {
        let root = root_object_mut(&mut self.document)?;
        for key in MAXED_TOP_LEVEL {
            root.insert(key.to_string(), JsonValue::from(MAX_VALUE));
        }

        if let Some(upgrades) = root.get_mut(UPGRADES_KEY) {
            let upgrades = upgrades
                .as_object_mut()
                .ok_or_else(|| not_an_object(UPGRADES_KEY))?;
            for (key, value) in upgrades.iter_mut() {
                let maxed = if UNLOCK_FLAGS.contains(&key.as_str()) {
                    1
                } else {
                    MAX_VALUE
                };
                *value = JsonValue::from(maxed);
            }
        }

        let stats = root
            .entry(STATS_KEY)
            .or_insert_with(|| JsonValue::Object(JsonMap::new()))
            .as_object_mut()
            .ok_or_else(|| not_an_object(STATS_KEY))?;
        for key in MAXED_STATS {
            stats.insert(key.to_string(), JsonValue::from(MAX_VALUE));
        }

        Ok(())
    }

    /// Discards every edit by re-importing the original save text.
    pub fn reset(&mut self) -> Result<(), CoreError> {
        let reloaded = Engine::new().open_str(&self.original, Some(self.format))?;
        self.document = reloaded.document;
        Ok(())
    }

    /// Serializes the document as compact JSON and encodes it for the game.
    pub fn to_encoded(&self) -> Result<String, CoreError> {
        let json = to_latin1_json(&self.document)?;
        Ok(codec::encode(&json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        to_pretty_json(&self.document)
    }

    /// Single-line JSON, as the game itself stores it before encoding.
    pub fn to_json_compact(&self) -> Result<String, CoreError> {
        to_compact_json(&self.document)
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        self.document
            .get(key)
            .and_then(JsonValue::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn string_list_mut(&mut self, key: &str) -> Result<&mut Vec<JsonValue>, CoreError> {
        root_object_mut(&mut self.document)?
            .entry(key)
            .or_insert_with(|| JsonValue::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| {
                CoreError::new(
                    CoreErrorCode::UnsupportedOperation,
                    format!("'{key}' is not a list"),
                )
            })
    }
}

fn parse_json(text: &str) -> Result<JsonValue, CoreError> {
    let value: JsonValue = serde_json::from_str(text)
        .map_err(|e| CoreError::new(CoreErrorCode::Parse, format!("invalid JSON: {e}")))?;
    if !value.is_object() {
        return Err(CoreError::new(
            CoreErrorCode::Parse,
            "save JSON must be an object at the top level",
        ));
    }
    Ok(value)
}

fn parse_encoded(text: &str) -> Result<JsonValue, CoreError> {
    let decoded = codec::decode(text)?;
    parse_json(&decoded).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Parse,
            format!("decoded save is not a JSON object: {}", e.message),
        )
    })
}

fn root_object_mut(document: &mut JsonValue) -> Result<&mut JsonMap<String, JsonValue>, CoreError> {
    document
        .as_object_mut()
        .ok_or_else(|| not_an_object("save document"))
}

fn path_segments(path: &str) -> Result<Vec<&str>, CoreError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(CoreError::new(
            CoreErrorCode::UnsupportedOperation,
            format!("invalid field path '{path}'"),
        ));
    }
    Ok(segments)
}

fn discovered_name(item: &str) -> &str {
    item.split(ITEM_NAME_SEPARATOR)
        .nth(1)
        .filter(|name| !name.is_empty())
        .unwrap_or(item)
}

fn missing_field(path: &str) -> CoreError {
    CoreError::new(
        CoreErrorCode::UnsupportedOperation,
        format!("save has no field '{path}'"),
    )
}

fn not_a_number(path: &str) -> CoreError {
    CoreError::new(
        CoreErrorCode::UnsupportedOperation,
        format!("field '{path}' is not a number"),
    )
}

fn not_an_object(what: &str) -> CoreError {
    CoreError::new(
        CoreErrorCode::UnsupportedOperation,
        format!("'{what}' is not an object"),
    )
}
