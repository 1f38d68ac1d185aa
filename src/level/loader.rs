use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;
use thiserror::Error;

/////////////////////////
/// RAW DATA STRUCTS  ///
/////////////////////////

/// A level set as found in the source data, keyed by filename-like level
/// keys, in document order. Entries are collected rather than stored in a
/// map so duplicate keys stay visible to validation instead of silently
/// collapsing.
#[derive(Debug, Clone, Default)]
pub struct RawLevels {
    pub entries: Vec<(String, RawLevel)>,
}

impl<'de> Deserialize<'de> for RawLevels {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(RawLevels {
            entries: map_entries(deserializer)?,
        })
    }
}

/// One level record, shaped exactly like the source data: camelCase keys,
/// layers keyed by id.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLevel {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "totalDuration", default)]
    pub total_duration: f64,

    #[serde(rename = "gradientClass", default)]
    pub gradient_class: String,

    #[serde(rename = "availableTools", default)]
    pub available_tools: Option<Vec<String>>,

    #[serde(default, deserialize_with = "map_entries")]
    pub layers: Vec<(String, RawLayer)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLayer {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "displayName", default)]
    pub display_name: String,

    #[serde(default)]
    pub color: String,

    #[serde(rename = "baseHeight", default)]
    pub base_height: f64,

    #[serde(default)]
    pub clips: Vec<RawClip>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawClip {
    #[serde(default)]
    pub id: String,

    pub left: RawPercent,
    pub width: RawPercent,

    #[serde(default)]
    pub title: String,

    /// Size hint as authored ("small" / "medium" / "large").
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Clip positions are authored as percentage strings (`'20%'`); bare
/// numbers are accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPercent {
    Text(String),
    Number(f64),
}

impl RawPercent {
    pub fn as_percent(&self) -> Result<f64, String> {
        match self {
            RawPercent::Number(n) => Ok(*n),
            RawPercent::Text(s) => {
                let trimmed = s.trim();
                let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
                digits
                    .parse::<f64>()
                    .map_err(|_| format!("expected a percentage like '20%', got '{s}'"))
            }
        }
    }
}

/// Collect a map's entries in document order without deduplicating keys.
fn map_entries<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct EntriesVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map with string keys")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

////////////////////////
/// PARSER FUNCTIONS ///
////////////////////////

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed level JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed level TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Public API: parse a level set from JSON, the shape the game data ships
/// in. Syntax only; invariants are the validator's business.
pub fn load_levels_from_str(s: &str) -> Result<RawLevels, LoadError> {
    Ok(serde_json::from_str(s)?)
}

/// Public API: parse a level set from TOML, for hand-authored level packs.
pub fn load_levels_from_toml_str(s: &str) -> Result<RawLevels, LoadError> {
    Ok(toml::from_str(s)?)
}

/// Public API: load a level set from disk, picking the parser by file
/// extension (`.toml` for TOML, JSON otherwise).
pub fn load_levels_from_file(path: &Path) -> Result<RawLevels, LoadError> {
    let contents = fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => load_levels_from_toml_str(&contents),
        _ => load_levels_from_str(&contents),
    }
}
