use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ridgeline_config::{LandscapeConfig, Presets, ValidatedConfig, ValidationPolicy};
use ridgeline_landscape::{Landscape, LandscapeSettings};
use ridgeline_system_palette::PaletteAssigner;

/// Where the landscape configuration comes from.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct SourceArgs {
    /// Builtin preset to start from (see `ridgeline presets`).
    #[arg(long, conflicts_with = "config")]
    pub(crate) preset: Option<String>,

    /// TOML configuration file.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Field seed overriding the configured one.
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Clamp out-of-range values instead of rejecting them.
    #[arg(long)]
    pub(crate) clamp: bool,
}

/// Configuration resolved from [`SourceArgs`], ready to build a landscape from.
#[derive(Debug)]
pub(crate) struct ResolvedSource {
    pub(crate) raw: LandscapeConfig,
    pub(crate) validated: ValidatedConfig,
    pub(crate) field_seed: u64,
    pub(crate) label: String,
}

impl SourceArgs {
    /// Loads the unvalidated configuration.
    pub(crate) fn load(&self) -> Result<(LandscapeConfig, String)> {
        if let Some(path) = &self.config {
            let config = LandscapeConfig::from_toml_file(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?;
            return Ok((config, path.display().to_string()));
        }

        if let Some(name) = &self.preset {
            let presets = Presets::builtin().context("failed to parse builtin presets")?;
            let config = presets.require(name)?.clone();
            return Ok((config, name.clone()));
        }

        Ok((LandscapeConfig::default(), "default".to_owned()))
    }

    /// Loads and validates the configuration and settles the field seed.
    pub(crate) fn resolve(&self) -> Result<ResolvedSource> {
        let (mut raw, label) = self.load()?;
        if self.seed.is_some() {
            raw.seed = self.seed;
        }

        let policy = if self.clamp {
            ValidationPolicy::Clamp
        } else {
            ValidationPolicy::Strict
        };
        let validated = raw
            .validate_with(policy)
            .with_context(|| format!("configuration '{label}' is invalid"))?;
        let field_seed = validated.seed.unwrap_or_else(rand::random);

        tracing::info!(
            target: "ridgeline::config",
            source = %label,
            field_seed,
            count = validated.parameters.count().get(),
            branching = validated.parameters.branching().get(),
            depth = validated.parameters.depth().get(),
            "config.resolved"
        );

        Ok(ResolvedSource {
            raw,
            validated,
            field_seed,
            label,
        })
    }
}

impl ResolvedSource {
    /// Builds a landscape whose field is still empty.
    pub(crate) fn landscape(&self) -> Landscape {
        Landscape::new(LandscapeSettings {
            parameters: self.validated.parameters,
            speed: self.validated.speed,
            palette: self.validated.style.palette.clone(),
            assigner: PaletteAssigner::default(),
            field_seed: self.field_seed,
        })
    }
}
