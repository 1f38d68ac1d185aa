use std::cmp::Ordering;
use std::collections::HashSet;
use thiserror::Error;

use super::loader::{RawClip, RawLayer, RawLevel};
use super::model::{Clip, ClipSize, Layer, Level, ToolCatalog};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("clip '{clip}' has a malformed {field}: {detail}")]
    MalformedClip {
        clip: String,
        field: &'static str,
        detail: String,
    },

    #[error("duplicate clip id '{clip}' in layer '{layer}'")]
    DuplicateClipId { layer: String, clip: String },

    #[error("clips '{first}' and '{second}' in layer '{layer}' overlap by {overlap}%")]
    ClipOverlap {
        layer: String,
        first: String,
        second: String,
        overlap: f64,
    },

    #[error("duplicate layer id '{layer}'")]
    DuplicateLayerId { layer: String },

    #[error("layers '{first}' and '{second}' both sit at baseHeight {base_height}")]
    BaseHeightCollision {
        first: String,
        second: String,
        base_height: f64,
    },

    #[error("unknown tool '{tool}'")]
    UnknownTool { tool: String },

    #[error("malformed {field}: {detail}")]
    MalformedLevel {
        field: &'static str,
        detail: String,
    },

    #[error("duplicate level key '{key}'")]
    DuplicateLevel { key: String },
}

/// Whether mathematically overlapping clips within a layer fail
/// validation or are merely logged. Shipped level data contains overlaps
/// the game tolerates, so renderers loading it want `Lenient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    #[default]
    Strict,
    Lenient,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    pub overlap: OverlapPolicy,
}

// Authoring convention: clips wider than this are hard to grab in the
// editor, so the validator flags them without failing.
const SELECTABLE_WIDTH: f64 = 25.0;

// Authoring convention for vertical spacing between layers.
const BASE_HEIGHT_SPACING: f64 = 30.0;

/// Check a single clip's position and width in percentage space. Pure;
/// appends every problem found and returns the converted clip only when
/// none were.
pub fn validate_clip(raw: &RawClip, errors: &mut Vec<ValidationError>) -> Option<Clip> {
    let before = errors.len();
    let malformed = |field, detail: String| ValidationError::MalformedClip {
        clip: raw.id.clone(),
        field,
        detail,
    };

    if raw.id.trim().is_empty() {
        errors.push(malformed("id", "id may not be empty".to_string()));
    }

    let left = match raw.left.as_percent() {
        Ok(v) if v.is_finite() && (0.0..=100.0).contains(&v) => Some(v),
        Ok(v) => {
            errors.push(malformed("left", format!("{v} is outside 0..=100")));
            None
        }
        Err(detail) => {
            errors.push(malformed("left", detail));
            None
        }
    };

    let width = match raw.width.as_percent() {
        Ok(v) if v.is_finite() && (0.0..=100.0).contains(&v) => Some(v),
        Ok(v) => {
            errors.push(malformed("width", format!("{v} is outside 0..=100")));
            None
        }
        Err(detail) => {
            errors.push(malformed("width", detail));
            None
        }
    };

    if let (Some(left), Some(width)) = (left, width) {
        if left + width > 100.0 {
            errors.push(malformed(
                "width",
                format!("left {left}% + width {width}% extends past the timeline end"),
            ));
        } else if width > SELECTABLE_WIDTH {
            log::warn!(
                "clip '{}' is {width}% wide; clips wider than {SELECTABLE_WIDTH}% are hard to select",
                raw.id
            );
        }
    }

    let size = match raw.kind.as_deref() {
        None => None,
        Some(s) => match ClipSize::parse(s) {
            Some(size) => Some(size),
            None => {
                errors.push(malformed("type", format!("unknown clip size '{s}'")));
                None
            }
        },
    };

    if errors.len() != before {
        return None;
    }
    Some(Clip {
        id: raw.id.clone(),
        left: left?,
        width: width?,
        title: raw.title.clone(),
        size,
    })
}

/// Check one layer: every clip valid, clip ids unique, and the non-overlap
/// rule `next.left >= prev.left + prev.width` over clips sorted by `left`.
/// The returned layer holds its clips in that sorted order.
pub fn validate_layer(
    id: &str,
    raw: &RawLayer,
    options: ValidationOptions,
    errors: &mut Vec<ValidationError>,
) -> Option<Layer> {
    let before = errors.len();

    let mut seen: HashSet<&str> = HashSet::new();
    for clip in &raw.clips {
        if !clip.id.trim().is_empty() && !seen.insert(clip.id.as_str()) {
            errors.push(ValidationError::DuplicateClipId {
                layer: id.to_string(),
                clip: clip.id.clone(),
            });
        }
    }

    let mut clips: Vec<Clip> = raw
        .clips
        .iter()
        .filter_map(|c| validate_clip(c, errors))
        .collect();
    clips.sort_by(|a, b| a.left.partial_cmp(&b.left).unwrap_or(Ordering::Equal));

    for pair in clips.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let overlap = prev.left + prev.width - next.left;
        if overlap > 0.0 {
            match options.overlap {
                OverlapPolicy::Strict => errors.push(ValidationError::ClipOverlap {
                    layer: id.to_string(),
                    first: prev.id.clone(),
                    second: next.id.clone(),
                    overlap,
                }),
                OverlapPolicy::Lenient => log::warn!(
                    "layer '{id}': clips '{}' and '{}' overlap by {overlap}%",
                    prev.id,
                    next.id
                ),
            }
        }
    }

    if errors.len() != before {
        return None;
    }
    Some(Layer {
        id: id.to_string(),
        name: raw.name.clone(),
        display_name: raw.display_name.clone(),
        color: raw.color.clone(),
        base_height: raw.base_height,
        clips,
    })
}

/// Check one level: every layer valid, layer ids unique, positive
/// duration, a theme, known tools, and pairwise-distinct base heights.
/// The returned level holds its layers in ascending base-height order.
pub fn validate_level(
    key: &str,
    raw: &RawLevel,
    catalog: &ToolCatalog,
    options: ValidationOptions,
    errors: &mut Vec<ValidationError>,
) -> Option<Level> {
    let before = errors.len();

    if !(raw.total_duration > 0.0) {
        errors.push(ValidationError::MalformedLevel {
            field: "totalDuration",
            detail: format!("must be positive, got {}", raw.total_duration),
        });
    }
    if raw.gradient_class.trim().is_empty() {
        errors.push(ValidationError::MalformedLevel {
            field: "gradientClass",
            detail: "may not be empty".to_string(),
        });
    }

    if !raw.name.is_empty() && raw.name != key {
        log::warn!("level '{key}': name '{}' does not mirror the key", raw.name);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (layer_id, _) in &raw.layers {
        if !seen.insert(layer_id.as_str()) {
            errors.push(ValidationError::DuplicateLayerId {
                layer: layer_id.clone(),
            });
        }
    }

    let mut layers: Vec<Layer> = raw
        .layers
        .iter()
        .filter_map(|(id, l)| validate_layer(id, l, options, errors))
        .collect();
    layers.sort_by(|a, b| {
        a.base_height
            .partial_cmp(&b.base_height)
            .unwrap_or(Ordering::Equal)
    });

    for pair in layers.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        let gap = upper.base_height - lower.base_height;
        if gap == 0.0 {
            errors.push(ValidationError::BaseHeightCollision {
                first: lower.id.clone(),
                second: upper.id.clone(),
                base_height: lower.base_height,
            });
        } else if gap < BASE_HEIGHT_SPACING {
            log::warn!(
                "level '{key}': layers '{}' and '{}' are only {gap} units apart",
                lower.id,
                upper.id
            );
        }
    }

    if let Some(tools) = &raw.available_tools {
        for tool in tools {
            if !catalog.contains(tool) {
                errors.push(ValidationError::UnknownTool { tool: tool.clone() });
            }
        }
    }

    if errors.len() != before {
        return None;
    }
    Some(Level {
        key: key.to_string(),
        name: if raw.name.is_empty() {
            key.to_string()
        } else {
            raw.name.clone()
        },
        total_duration: raw.total_duration,
        gradient_class: raw.gradient_class.clone(),
        available_tools: raw.available_tools.clone(),
        layers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::loader::RawPercent;

    fn clip(id: &str, left: f64, width: f64) -> RawClip {
        RawClip {
            id: id.to_string(),
            left: RawPercent::Number(left),
            width: RawPercent::Number(width),
            title: String::new(),
            kind: None,
        }
    }

    #[test]
    fn touching_clips_are_not_an_overlap() {
        let raw = RawLayer {
            name: String::new(),
            display_name: String::new(),
            color: String::new(),
            base_height: 40.0,
            clips: vec![clip("a", 10.0, 20.0), clip("b", 30.0, 5.0)],
        };
        let mut errors = Vec::new();
        let layer = validate_layer("band", &raw, ValidationOptions::default(), &mut errors);
        assert!(layer.is_some(), "{errors:?}");
        assert!(errors.is_empty());
    }

    #[test]
    fn overlap_amount_is_measured() {
        let raw = RawLayer {
            name: String::new(),
            display_name: String::new(),
            color: String::new(),
            base_height: 40.0,
            clips: vec![clip("a", 10.0, 20.0), clip("b", 25.0, 10.0)],
        };
        let mut errors = Vec::new();
        assert!(validate_layer("band", &raw, ValidationOptions::default(), &mut errors).is_none());
        match &errors[..] {
            [ValidationError::ClipOverlap {
                first,
                second,
                overlap,
                ..
            }] => {
                assert_eq!(first, "a");
                assert_eq!(second, "b");
                assert_eq!(*overlap, 5.0);
            }
            other => panic!("unexpected errors: {other:?}"),
        }
    }

    #[test]
    fn percent_strings_parse() {
        assert_eq!(RawPercent::Text("20%".to_string()).as_percent(), Ok(20.0));
        assert_eq!(RawPercent::Text(" 7.5% ".to_string()).as_percent(), Ok(7.5));
        assert_eq!(RawPercent::Number(60.0).as_percent(), Ok(60.0));
        assert!(RawPercent::Text("wide".to_string()).as_percent().is_err());
    }
}
