//! Sampling constants, defaults and the JSON config file model.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::spec::{EnumSampleFailureMode, EnumSampleStaleFileStrategy, SpecSampleOptions};

/// Images taken per category when nothing else is configured.
pub const N_COUNT_PER_CATEGORY_DEFAULT: usize = 3;
/// Accepted image extensions when nothing else is configured.
pub const TUP_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
/// Extension of every copied file.
pub const C_EXT_OUTPUT_DEFAULT: &str = "jpg";
/// Source root, relative to the working directory.
pub const C_DIR_SOURCE_DEFAULT: &str = "Images";
/// Destination root, relative to the working directory.
pub const C_DIR_DESTINATION_DEFAULT: &str = "public/breeds";

/// Config file loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// File is not valid config JSON.
    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk configuration. Every key is optional; missing keys fall back to
/// the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecSampleConfig {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub count_per_category: Option<usize>,
    pub extensions: Option<Vec<String>>,
    pub ext_output: Option<String>,
    pub remove_stale: Option<bool>,
    pub fail_fast: Option<bool>,
    pub preserve_metadata: Option<bool>,
}

impl SpecSampleConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Overlay `other` on top of `self`: keys set in `other` win.
    pub fn merge(self, other: SpecSampleConfig) -> Self {
        Self {
            source: other.source.or(self.source),
            destination: other.destination.or(self.destination),
            count_per_category: other.count_per_category.or(self.count_per_category),
            extensions: other.extensions.or(self.extensions),
            ext_output: other.ext_output.or(self.ext_output),
            remove_stale: other.remove_stale.or(self.remove_stale),
            fail_fast: other.fail_fast.or(self.fail_fast),
            preserve_metadata: other.preserve_metadata.or(self.preserve_metadata),
        }
    }

    pub fn dir_source(&self) -> PathBuf {
        self.source
            .clone()
            .unwrap_or_else(|| PathBuf::from(C_DIR_SOURCE_DEFAULT))
    }

    pub fn dir_destination(&self) -> PathBuf {
        self.destination
            .clone()
            .unwrap_or_else(|| PathBuf::from(C_DIR_DESTINATION_DEFAULT))
    }

    /// Resolve into engine options. Dry-run is a per-invocation switch and
    /// is never read from file.
    pub fn to_options(&self, if_dry_run: bool) -> SpecSampleOptions {
        let spec_default = SpecSampleOptions::default();
        SpecSampleOptions {
            count_per_category: self
                .count_per_category
                .unwrap_or(spec_default.count_per_category),
            extensions: self
                .extensions
                .clone()
                .unwrap_or(spec_default.extensions),
            ext_output: self.ext_output.clone().unwrap_or(spec_default.ext_output),
            rule_stale: match self.remove_stale {
                Some(true) => EnumSampleStaleFileStrategy::Remove,
                _ => EnumSampleStaleFileStrategy::Keep,
            },
            rule_failure: match self.fail_fast {
                Some(true) => EnumSampleFailureMode::Abort,
                _ => EnumSampleFailureMode::Isolate,
            },
            if_preserve_metadata: self
                .preserve_metadata
                .unwrap_or(spec_default.if_preserve_metadata),
            if_dry_run,
        }
    }
}
