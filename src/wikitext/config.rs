//! Tokenizer configuration
//!
//! `defaults/wikitok.default.toml` is embedded into the crate so that documentation and runtime
//! behavior stay in sync. Applications layer user-specific files on top of those defaults via
//! [Loader] before deserializing into [TokenizerConfig].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/wikitok.default.toml");

/// Knobs consumed by the reference scanner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenizerConfig {
    /// Maximum number of open chunks, the base chunk included. A construct whose chunks would
    /// exceed it is scanned as plain text. Bounds the recursion depth of the scanner on
    /// adversarial input.
    pub max_nesting_depth: usize,
    /// Keep HTML comments as [Comment](crate::wikitext::Token::Comment) tokens. When false they
    /// are dropped and do not survive a round trip.
    pub preserve_comments: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 64,
            preserve_comments: true,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TokenizerConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TokenizerConfig, ConfigError> {
    Loader::new().build()
}
