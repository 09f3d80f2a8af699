use serde::Deserialize;

use crate::{ConfigError, LandscapeConfig, LOG_TARGET};

/// Builtin presets, embedded at compile time.
pub const BUILTIN_PRESETS: &str = include_str!("data/presets.json");

/// Configuration registered under a preset name.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NamedPreset {
    /// Lookup name, in `snake_case`.
    pub name: String,
    /// Configuration the preset expands to.
    pub config: LandscapeConfig,
}

#[derive(Deserialize)]
struct PresetsFile {
    presets: Vec<NamedPreset>,
}

/// Ordered collection of named presets.
#[derive(Clone, Debug)]
pub struct Presets {
    entries: Vec<NamedPreset>,
}

impl Presets {
    /// Parses the builtin preset list.
    pub fn builtin() -> Result<Self, ConfigError> {
        let presets = Self::from_json_str(BUILTIN_PRESETS)?;
        tracing::info!(
            target: LOG_TARGET,
            count = presets.len(),
            "presets.loaded=builtin"
        );
        Ok(presets)
    }

    /// Parses a preset list from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let parsed: PresetsFile = serde_json::from_str(json)?;
        Ok(Self {
            entries: parsed.presets,
        })
    }

    /// Looks up a preset by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NamedPreset> {
        self.entries.iter().find(|preset| preset.name == name)
    }

    /// Looks up a preset by name, failing with [`ConfigError::UnknownPreset`].
    pub fn require(&self, name: &str) -> Result<&LandscapeConfig, ConfigError> {
        self.get(name)
            .map(|preset| &preset.config)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_owned()))
    }

    /// Presets in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &NamedPreset> {
        self.entries.iter()
    }

    /// Number of presets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the collection holds no presets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_presets_parse_and_validate() {
        let presets = Presets::builtin().expect("builtin presets parse");
        assert_eq!(presets.len(), 9);

        for preset in presets.iter() {
            let validated = preset
                .config
                .validate()
                .unwrap_or_else(|error| panic!("{} invalid: {error}", preset.name));
            assert!(!validated.style.palette.colors().is_empty());
        }
    }

    #[test]
    fn lookup_by_name() {
        let presets = Presets::builtin().expect("builtin presets parse");
        let himalaya = presets.require("himalaya").expect("preset exists");
        assert_eq!(himalaya.number_of_mountains, 16);
        assert_eq!(himalaya.max_points_per_depth, 4);
        assert_eq!(himalaya.depth, 4);

        assert!(matches!(
            presets.require("atlantis"),
            Err(ConfigError::UnknownPreset(name)) if name == "atlantis"
        ));
    }
}
