use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::level::{
    Layer, Level, RawLevels, ToolCatalog, ValidationError, ValidationOptions, validate_level,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("unknown level '{0}'")]
    UnknownLevel(String),
}

/// One validation failure, tagged with the level key it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelFailure {
    pub key: String,
    pub error: ValidationError,
}

impl fmt::Display for LevelFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.error)
    }
}

/// Everything that went wrong across a whole load, so content authors can
/// fix every level in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateValidationError {
    pub failures: Vec<LevelFailure>,
}

impl fmt::Display for AggregateValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} level validation failure(s):", self.failures.len())?;
        for failure in &self.failures {
            writeln!(f, "  {failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateValidationError {}

/// A tool available in an earlier level but missing from a later one,
/// against the grain of the game's unlock progression.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRegression {
    pub earlier: String,
    pub later: String,
    pub tool: String,
}

/// Immutable lookup store over validated levels, in source document order.
/// Built once at startup; safe to share for concurrent reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    levels: Vec<Level>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Validate every entry and build the registry, atomically: any failing
    /// level fails the whole load, and the error carries every failure
    /// found, not just the first.
    pub fn load(
        raw: RawLevels,
        catalog: &ToolCatalog,
        options: ValidationOptions,
    ) -> Result<Registry, AggregateValidationError> {
        let (registry, failures) = Self::load_partial(raw, catalog, options);
        if failures.is_empty() {
            Ok(registry)
        } else {
            Err(AggregateValidationError { failures })
        }
    }

    /// Partial-load semantics: the valid subset of levels plus the full
    /// failure report. Never a silent partial success — callers get both.
    pub fn load_partial(
        raw: RawLevels,
        catalog: &ToolCatalog,
        options: ValidationOptions,
    ) -> (Registry, Vec<LevelFailure>) {
        let mut levels: Vec<Level> = Vec::with_capacity(raw.entries.len());
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut failures: Vec<LevelFailure> = Vec::new();

        for (key, raw_level) in &raw.entries {
            if index.contains_key(key) {
                failures.push(LevelFailure {
                    key: key.clone(),
                    error: ValidationError::DuplicateLevel { key: key.clone() },
                });
                continue;
            }

            let mut errors = Vec::new();
            match validate_level(key, raw_level, catalog, options, &mut errors) {
                Some(level) => {
                    index.insert(key.clone(), levels.len());
                    levels.push(level);
                }
                None => failures.extend(errors.into_iter().map(|error| LevelFailure {
                    key: key.clone(),
                    error,
                })),
            }
        }

        let registry = Registry { levels, index };
        for regression in registry.tool_regressions(catalog) {
            log::warn!(
                "level '{}' loses tool '{}' that '{}' had unlocked",
                regression.later,
                regression.tool,
                regression.earlier
            );
        }
        (registry, failures)
    }

    pub fn get(&self, key: &str) -> Result<&Level, RegistryError> {
        self.index
            .get(key)
            .map(|&i| &self.levels[i])
            .ok_or_else(|| RegistryError::UnknownLevel(key.to_string()))
    }

    /// Level keys in source document order. Each call starts a fresh pass.
    pub fn list(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|l| l.key.as_str())
    }

    /// Layers of a level in ascending base-height order, clips sorted by
    /// position within each layer.
    pub fn layers_of(&self, key: &str) -> Result<&[Layer], RegistryError> {
        Ok(&self.get(key)?.layers)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Tools that drop out between consecutive levels. The shipped
    /// narrative only ever adds tools day over day, so a regression is
    /// worth flagging to the author; it is never fatal.
    pub fn tool_regressions(&self, catalog: &ToolCatalog) -> Vec<ToolRegression> {
        let mut regressions = Vec::new();
        for pair in self.levels.windows(2) {
            let (earlier, later) = (&pair[0], &pair[1]);
            let later_tools = later.tools(catalog);
            for tool in earlier.tools(catalog) {
                if !later_tools.contains(&tool) {
                    regressions.push(ToolRegression {
                        earlier: earlier.key.clone(),
                        later: later.key.clone(),
                        tool: tool.to_string(),
                    });
                }
            }
        }
        regressions
    }
}
