//! Shared configuration loader for chef.
//!
//! `defaults/chef.default.toml` is embedded into the binary so that docs and
//! runtime behavior stay in sync. A project `chef.toml` and command-line
//! overrides are layered on top via [`Loader`] before deserializing into
//! [`ChefConfig`].

use chef_brewer::{BrewOptions, MatchMode, SourceSelector};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/chef.default.toml");

/// Project-local configuration file picked up when present
pub const PROJECT_CONFIG_FILE: &str = "chef.toml";

/// Top-level configuration consumed by chef.
#[derive(Debug, Clone, Deserialize)]
pub struct ChefConfig {
    pub brew: BrewConfig,
    pub paths: PathsConfig,
}

/// Mirrors the knobs of the macro brewer.
#[derive(Debug, Clone, Deserialize)]
pub struct BrewConfig {
    pub separator: String,
    pub header: String,
    pub matching: MatchMode,
    pub extra_iterations: usize,
}

/// Where grammar sources live and where the brewed grammar goes.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    pub grammar_dir: PathBuf,
    pub source_pattern: String,
    pub output: PathBuf,
}

impl From<&BrewConfig> for BrewOptions {
    fn from(config: &BrewConfig) -> Self {
        BrewOptions {
            separator: config.separator.clone(),
            header: config.header.clone(),
            matching: config.matching,
            extra_iterations: config.extra_iterations,
        }
    }
}

impl PathsConfig {
    /// Selector for the newest versioned source in the grammar directory.
    pub fn latest_source(&self) -> SourceSelector {
        SourceSelector::Latest {
            dir: self.grammar_dir.clone(),
            pattern: self.source_pattern.clone(),
        }
    }
}

/// Builds a [`ChefConfig`] from chef's three layers, lowest first:
///
/// 1. the embedded `chef.default.toml`,
/// 2. the project file (`chef.toml` in the working directory, or the file
///    given with `--config`),
/// 3. the `--matching` and `--output` flags of `chef brew`.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Only the embedded defaults, no project file.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Defaults plus the project file.
    ///
    /// An explicit `--config` path must exist; otherwise `chef.toml` is read
    /// from the working directory when there is one.
    pub fn for_project(explicit: Option<&Path>) -> Self {
        match explicit {
            Some(path) => Self::new().with_file(path),
            None => Self::new().with_optional_file(PROJECT_CONFIG_FILE),
        }
    }

    /// Layer a project file that has to exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a project file, skipped when absent.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// `--matching`: overrides `brew.matching`. Checked at [`Loader::build`].
    pub fn with_matching(self, matching: Option<&str>) -> Result<Self, ConfigError> {
        match matching {
            Some(mode) => self.set_override("brew.matching", mode),
            None => Ok(self),
        }
    }

    /// `--output`: overrides `paths.output`.
    pub fn with_output(self, output: Option<&Path>) -> Result<Self, ConfigError> {
        match output {
            Some(path) => self.set_override("paths.output", path.to_string_lossy().into_owned()),
            None => Ok(self),
        }
    }

    /// Override any single key, e.g. `brew.extra_iterations`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge the layers and deserialize them.
    pub fn build(self) -> Result<ChefConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone, as used when no project is around.
pub fn load_defaults() -> Result<ChefConfig, ConfigError> {
    Loader::new().build()
}
