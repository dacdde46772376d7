//! Sampling specification models and top-level error types.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::conf::{C_EXT_OUTPUT_DEFAULT, N_COUNT_PER_CATEGORY_DEFAULT, TUP_IMAGE_EXTENSIONS};

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Policy for files in a destination category folder that are not part of
/// the current run's target names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumSampleStaleFileStrategy {
    /// Leave every other file in place. Only target names are overwritten.
    Keep,
    /// Delete regular files that are not in the current target set.
    Remove,
}

/// What a failure inside one category does to the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumSampleFailureMode {
    /// Record the category error in the report and continue.
    Isolate,
    /// Stop at the first category error. Earlier categories stay written.
    Abort,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `sample_tree`.
#[derive(Debug, Clone)]
pub struct SpecSampleOptions {
    /// Maximum number of images taken from each category.
    pub count_per_category: usize,
    /// Accepted image extensions, matched case-insensitively on the file name.
    pub extensions: Vec<String>,
    /// Extension given to every copied file, regardless of the source extension.
    pub ext_output: String,
    /// Stale destination file behavior.
    pub rule_stale: EnumSampleStaleFileStrategy,
    /// Category failure behavior.
    pub rule_failure: EnumSampleFailureMode,
    /// Carry permissions, timestamps and extended attributes over to the copy.
    pub if_preserve_metadata: bool,
    /// Do not mutate filesystem; record what would happen.
    pub if_dry_run: bool,
}

impl Default for SpecSampleOptions {
    fn default() -> Self {
        Self {
            count_per_category: N_COUNT_PER_CATEGORY_DEFAULT,
            extensions: TUP_IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            ext_output: C_EXT_OUTPUT_DEFAULT.to_string(),
            rule_stale: EnumSampleStaleFileStrategy::Keep,
            rule_failure: EnumSampleFailureMode::Isolate,
            if_preserve_metadata: true,
            if_dry_run: false,
        }
    }
}

/// One sampling failure item with path + error text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecSampleError {
    /// Category the failure belongs to.
    pub category: String,
    /// Failed source or destination path.
    pub path: PathBuf,
    /// User-facing error text.
    pub exception: String,
}

/// One planned or committed image copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecImageSelection {
    /// Original file inside the source category folder.
    pub path_src: PathBuf,
    /// Renamed file inside the destination category folder.
    pub path_dst: PathBuf,
    /// Original file name.
    pub name_src: String,
    /// Target file name (`1.jpg`, `2.jpg`, ...).
    pub name_dst: String,
}

/// Per-category result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpecCategoryOutcome {
    /// Category (folder) name.
    pub name: String,
    /// Number of qualifying images found in the source folder.
    pub cnt_images: usize,
    /// Selected images in target order.
    pub selections: Vec<SpecImageSelection>,
    /// Destination category folder was created by this run.
    pub if_created: bool,
    /// Stale files deleted from the destination category folder.
    pub stale_removed: Vec<PathBuf>,
}

/// "Top-level call failed" errors (input validation / setup stage, or an
/// aborted run).
#[derive(Debug, Error)]
pub enum SampleTreeError {
    /// Invalid option value.
    #[error("{0}")]
    InvalidOptions(String),
    /// Source root does not exist. Nothing has been written.
    #[error("Source directory {} does not exist.", .0.display())]
    SourceMissing(PathBuf),
    /// Source path exists but is not a directory.
    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),
    /// Source and destination overlap (`src` contains `dst` or vice versa).
    #[error(
        "Source and destination directories overlap: {} <-> {}",
        .path_source.display(),
        .path_destination.display()
    )]
    SourceDestinationOverlap {
        /// Source directory.
        path_source: PathBuf,
        /// Destination directory.
        path_destination: PathBuf,
    },
    /// Destination directory initialization failed.
    #[error("Failed to initialize destination {}: {message}", .path.display())]
    DestinationInitFailed {
        /// Destination path that failed initialization.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Source root listing failed.
    #[error("Failed to read source directory {}: {message}", .path.display())]
    SourceReadFailed {
        /// Source root.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// A category failed while running with [`EnumSampleFailureMode::Abort`].
    #[error("Category `{category}` failed at {}: {exception}", .path.display())]
    CategoryFailed {
        /// Category name.
        category: String,
        /// Failed source or destination path.
        path: PathBuf,
        /// User-facing error text.
        exception: String,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
