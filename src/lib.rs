pub mod level;
pub mod registry;

pub use level::{
    Clip, ClipSize, Layer, Level, LoadError, OverlapPolicy, RawClip, RawLayer, RawLevel, RawLevels,
    RawPercent, ToolCatalog, ValidationError, ValidationOptions, load_levels_from_file,
    load_levels_from_str, load_levels_from_toml_str,
};
pub use registry::{
    AggregateValidationError, LevelFailure, Registry, RegistryError, ToolRegression,
};

#[cfg(feature = "wasm")]
mod wasm_bindings {
    use super::*;
    use serde_wasm_bindgen::to_value;
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    pub struct WasmLevelSet {
        registry: Registry,
    }

    #[wasm_bindgen]
    impl WasmLevelSet {
        /// Create a level set from the game's JSON level data. Overlap
        /// checking is lenient here: the shipped data overlaps in the
        /// later, more chaotic levels and the game renders it anyway.
        #[wasm_bindgen(constructor)]
        pub fn new(levels_json: &str) -> Result<WasmLevelSet, JsValue> {
            let raw =
                load_levels_from_str(levels_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
            let options = ValidationOptions {
                overlap: OverlapPolicy::Lenient,
            };
            let registry = Registry::load(raw, &ToolCatalog::standard(), options)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(WasmLevelSet { registry })
        }

        /// Level keys in play order.
        #[wasm_bindgen]
        pub fn level_keys(&self) -> JsValue {
            to_value(&self.registry.list().collect::<Vec<_>>()).unwrap_or(JsValue::NULL)
        }

        /// One validated level, shaped like the source data.
        #[wasm_bindgen]
        pub fn level(&self, key: &str) -> Result<JsValue, JsValue> {
            let level = self
                .registry
                .get(key)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(to_value(level).unwrap_or(JsValue::NULL))
        }

        /// Layers of a level in render order, clips position-sorted.
        #[wasm_bindgen]
        pub fn layers_of(&self, key: &str) -> Result<JsValue, JsValue> {
            let layers = self
                .registry
                .layers_of(key)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(to_value(layers).unwrap_or(JsValue::NULL))
        }
    }
}
