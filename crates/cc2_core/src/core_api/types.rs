use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    /// Plain JSON text.
    Json,
    /// The game's LZW token string.
    Encoded,
}

impl SaveFormat {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Json => "json",
            Self::Encoded => "encoded",
        }
    }
}

impl fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format: SaveFormat,
    pub money: i64,
    pub tickets: i64,
    pub tokens: i64,
    pub xp: i64,
    pub inventory_count: usize,
    pub discovered_count: usize,
}
