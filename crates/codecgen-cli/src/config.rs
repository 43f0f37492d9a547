//! Configuration for codecgen.
//!
//! Loads config from:
//! 1. Global: ~/.config/codecgen/config.toml
//! 2. Per-package: codecgen.toml in the package directory (overrides global)
//!
//! Example codecgen.toml:
//! ```toml
//! [generate]
//! suffix = "JSON"
//! gofmt = true
//!
//! [external]
//! "github.com/ethereum/go-ethereum/common/hexutil.Big" = "math/big.Int"
//! ```

use codecgen::types::{PREDECLARED, Package, TypeRef};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Per-package config file name.
pub const PACKAGE_CONFIG: &str = "codecgen.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid external type name {0:?}: expected \"import/path.Name\"")]
    ExternalName(String),

    #[error("invalid underlying type {value:?} for external type {name}")]
    ExternalType { name: String, value: String },
}

/// Generation settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GenerateConfig {
    /// Suffix of the wire type name.
    pub suffix: Option<String>,
    /// Whether to pipe output through gofmt.
    pub gofmt: Option<bool>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CodecgenConfig {
    pub generate: GenerateConfig,
    /// Underlying types of imported named types, keyed by `path.Name`.
    pub external: BTreeMap<String, String>,
}

impl CodecgenConfig {
    /// Load configuration for the package in `dir`.
    ///
    /// Missing files are ignored; unreadable or malformed files are errors.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        Self::load_from(Self::global_config_path().as_deref(), dir)
    }

    fn load_from(global: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(global) = global {
            if let Some(loaded) = Self::load_file(global)? {
                config = config.merge(loaded);
            }
        }

        if let Some(package) = Self::load_file(&dir.join(PACKAGE_CONFIG))? {
            config = config.merge(package);
        }

        Ok(config)
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("codecgen").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        tracing::debug!(path = %path.display(), "loading config");
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Merge another config into this one; values set in `other` win.
    fn merge(mut self, other: Self) -> Self {
        self.generate.suffix = other.generate.suffix.or(self.generate.suffix);
        self.generate.gofmt = other.generate.gofmt.or(self.generate.gofmt);
        self.external.extend(other.external);
        self
    }

    pub fn suffix(&self) -> &str {
        self.generate
            .suffix
            .as_deref()
            .unwrap_or(codecgen::DEFAULT_SUFFIX)
    }

    pub fn gofmt(&self) -> bool {
        self.generate.gofmt.unwrap_or(false)
    }

    /// The `[external]` table as `(package, name, underlying)` declarations.
    pub fn external_types(&self) -> Result<Vec<(Package, String, TypeRef)>, ConfigError> {
        let mut types = Vec::with_capacity(self.external.len());
        for (key, value) in &self.external {
            let (path, name) =
                split_qualified(key).ok_or_else(|| ConfigError::ExternalName(key.clone()))?;
            let underlying = parse_type(value).ok_or_else(|| ConfigError::ExternalType {
                name: key.clone(),
                value: value.clone(),
            })?;
            types.push((Package::from_path(path), name.to_string(), underlying));
        }
        Ok(types)
    }
}

/// Split `import/path.Name` at the dot following the last slash.
fn split_qualified(s: &str) -> Option<(&str, &str)> {
    let start = s.rfind('/').map_or(0, |i| i + 1);
    let dot = start + s[start..].rfind('.')?;
    let (path, name) = (&s[..dot], &s[dot + 1..]);
    (!path.is_empty() && !name.is_empty()).then_some((path, name))
}

/// Parse a type written as a predeclared name, `path.Name`, or either
/// prefixed with `*` or `[]`.
fn parse_type(s: &str) -> Option<TypeRef> {
    let s = s.trim();
    if let Some(rest) = s.strip_prefix('*') {
        return parse_type(rest).map(TypeRef::pointer);
    }
    if let Some(rest) = s.strip_prefix("[]") {
        return parse_type(rest).map(TypeRef::slice);
    }
    if s == "any" || s == "interface{}" {
        return Some(TypeRef::any());
    }
    if PREDECLARED.contains(&s) {
        return Some(TypeRef::basic(s));
    }
    let (path, name) = split_qualified(s)?;
    Some(TypeRef::named(&Package::from_path(path), name))
}
