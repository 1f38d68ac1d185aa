mod loader;
mod model;
mod validator;

pub use loader::{
    LoadError, RawClip, RawLayer, RawLevel, RawLevels, RawPercent, load_levels_from_file,
    load_levels_from_str, load_levels_from_toml_str,
};

// Minimal, intentional surface area: the raw structs are part of the API so
// callers can hand the registry an already-materialized level mapping.
pub use model::{Clip, ClipSize, Layer, Level, ToolCatalog};
pub use validator::{
    OverlapPolicy, ValidationError, ValidationOptions, validate_clip, validate_layer,
    validate_level,
};
