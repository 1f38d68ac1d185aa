use serde::Serialize;

///////////////////////////////
/// LEVEL STRUCTS AND ENUMS ///
///////////////////////////////

/// Validated level as consumed by the renderer and the tools layer.
/// Layers are stored in ascending `base_height` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level {
    /// Source map key, e.g. `3_first_viola_restoration.wav`.
    pub key: String,
    /// Mirrors `key` in well-formed data.
    pub name: String,
    /// Timeline span in seconds; clip positions are percentages of this.
    #[serde(rename = "totalDuration")]
    pub total_duration: f64,
    /// Identifier of an externally defined visual theme.
    #[serde(rename = "gradientClass")]
    pub gradient_class: String,
    /// Editing tools unlocked for this level. `None` means every tool in
    /// the catalog is available.
    #[serde(rename = "availableTools", skip_serializing_if = "Option::is_none")]
    pub available_tools: Option<Vec<String>>,
    pub layers: Vec<Layer>,
}

impl Level {
    /// Tools unlocked for this level, resolving an absent list to the
    /// whole catalog.
    pub fn tools<'a>(&'a self, catalog: &'a ToolCatalog) -> Vec<&'a str> {
        match &self.available_tools {
            Some(tools) => tools.iter().map(String::as_str).collect(),
            None => catalog.ids().collect(),
        }
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }
}

/// A vertical display band grouping related clips.
/// Clips are stored sorted by `left` after validation, regardless of
/// authoring order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    /// Map key in the source data, kebab-case by convention.
    pub id: String,
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    /// Display color (hex string); styling only.
    pub color: String,
    /// Vertical offset; distinct across all layers of a level.
    #[serde(rename = "baseHeight")]
    pub base_height: f64,
    pub clips: Vec<Clip>,
}

/// A single labeled audio event on the level timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clip {
    pub id: String,
    /// Percentage offset of timeline start, 0..=100.
    pub left: f64,
    /// Percentage extent, 0..=100; `left + width <= 100`.
    pub width: f64,
    pub title: String,
    /// Display size hint; never checked against `width`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub size: Option<ClipSize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipSize {
    Small,
    Medium,
    Large,
}

impl ClipSize {
    pub fn parse(s: &str) -> Option<ClipSize> {
        match s {
            "small" => Some(ClipSize::Small),
            "medium" => Some(ClipSize::Medium),
            "large" => Some(ClipSize::Large),
            _ => None,
        }
    }
}

/// The closed set of editing tool identifiers, owned by the tools layer
/// and handed to validation. Order is unlock order.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCatalog {
    tools: Vec<String>,
}

impl ToolCatalog {
    /// The eleven tools of the shipped game, from the first evening of
    /// police work up to the full Day 9 kit.
    pub fn standard() -> Self {
        ToolCatalog {
            tools: [
                "mute", "volume", "noise", "voice", "pitch", "reverse", "speed", "highpass",
                "lowpass", "stereo", "bitrate",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    pub fn custom<I, S>(tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ToolCatalog {
            tools: tools.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tools.iter().any(|t| t == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
