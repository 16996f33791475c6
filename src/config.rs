//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/nested-sets/nested-sets.toml`
//! 3. Explicit config file (`--config <file>`)
//! 4. Environment variables: `NESTED_SETS__<SECTION>__<KEY>`

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{NestedSetBuilder, DEFAULT_INITIAL_CAPACITY};
use crate::generator::TreeGenerator;

const APP_NAME: &str = "nested-sets";
const ENV_PREFIX: &str = "NESTED_SETS";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config error: {0}")]
    Load(#[from] ConfigError),

    #[error("invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Builder tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuilderSettings {
    /// Entry slots reserved before the buffer first grows
    pub initial_capacity: usize,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

/// Shape of generated trees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Children per internal node
    pub fanout: usize,
    /// Levels below the root
    pub depth: u32,
    /// Id of the first generated node
    pub first_id: i64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            fanout: 3,
            depth: 3,
            first_id: 1,
        }
    }
}

/// Unified configuration for nested-sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub builder: BuilderSettings,
    pub generator: GeneratorSettings,
}

/// Get the XDG config directory for nested-sets.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{APP_NAME}.toml")))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file, must exist when given
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default(
                "builder.initial_capacity",
                defaults.builder.initial_capacity as i64,
            )?
            .set_default("generator.fanout", defaults.generator.fanout as i64)?
            .set_default("generator.depth", i64::from(defaults.generator.depth))?
            .set_default("generator.first_id", defaults.generator.first_id)?;

        if let Some(global_path) = global_config_path() {
            debug!("global config: {}", global_path.display());
            builder = builder.add_source(
                File::from(global_path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        if let Some(path) = config_file {
            debug!("explicit config: {}", path.display());
            builder = builder.add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.builder.initial_capacity == 0 {
            return Err(SettingsError::Invalid {
                key: "builder.initial_capacity",
                message: "must be at least 1".to_string(),
            });
        }
        if self.generator.fanout == 0 {
            return Err(SettingsError::Invalid {
                key: "generator.fanout",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn nested_set_builder(&self) -> NestedSetBuilder {
        NestedSetBuilder::new().with_initial_capacity(self.builder.initial_capacity)
    }

    pub fn tree_generator(&self) -> TreeGenerator {
        TreeGenerator::new(self.generator.fanout)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# nested-sets configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/nested-sets/nested-sets.toml
#   Explicit: --config <file>
#   Env:      NESTED_SETS__<SECTION>__<KEY>, e.g. NESTED_SETS__GENERATOR__DEPTH=5

[builder]
# Entry slots reserved before the buffer first doubles
# initial_capacity = 64

[generator]
# Children per internal node of generated trees
# fanout = 3

# Levels below the root
# depth = 3

# Id of the first generated node; later ids count up from here
# first_id = 1
"#
        .to_string()
    }
}
