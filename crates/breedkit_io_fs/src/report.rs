//! Sampling report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::spec::{SpecCategoryOutcome, SpecSampleError};

/// Aggregate counters and diagnostics for one `sample_tree` run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ReportSample {
    /// Number of category folders found under the source root.
    pub cnt_categories: u64,
    /// Total file entries scanned inside category folders.
    pub cnt_scanned: u64,
    /// Number of scanned entries that qualified as images.
    pub cnt_matched: u64,
    /// Number of images copied.
    pub cnt_copied: u64,
    /// Number of planned copies not performed (dry-run).
    pub cnt_skipped: u64,
    /// Number of stale destination files deleted.
    pub cnt_removed: u64,
    /// The destination root did not exist and was created by this run.
    pub if_created_destination: bool,
    /// Per-category outcomes in processing order.
    pub categories: Vec<SpecCategoryOutcome>,
    /// Non-fatal warnings collected during the run.
    pub warnings: Vec<String>,
    /// Per-entry failures.
    pub errors: Vec<SpecSampleError>,
}

impl ReportSample {
    /// Number of collected hard errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// `true` when no category recorded an error.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_categories".to_string(), self.cnt_categories);
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_matched".to_string(), self.cnt_matched);
        dict_counts.insert("cnt_copied".to_string(), self.cnt_copied);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_removed".to_string(), self.cnt_removed);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} categories={} scanned={} matched={} copied={} skipped={} removed={} errors={} warnings={}",
            dict_counts["cnt_categories"],
            dict_counts["cnt_scanned"],
            dict_counts["cnt_matched"],
            dict_counts["cnt_copied"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_removed"],
            dict_counts["cnt_errors"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[SAMPLE]"))
    }
}

/// Mutable accumulator for sampling statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportSampleBuilder {
    /// See [`ReportSample::cnt_categories`].
    pub cnt_categories: u64,
    /// See [`ReportSample::cnt_scanned`].
    pub cnt_scanned: u64,
    /// See [`ReportSample::cnt_matched`].
    pub cnt_matched: u64,
    /// See [`ReportSample::cnt_copied`].
    pub cnt_copied: u64,
    /// See [`ReportSample::cnt_skipped`].
    pub cnt_skipped: u64,
    /// See [`ReportSample::cnt_removed`].
    pub cnt_removed: u64,
    /// See [`ReportSample::if_created_destination`].
    pub if_created_destination: bool,
    /// See [`ReportSample::categories`].
    pub categories: Vec<SpecCategoryOutcome>,
    /// See [`ReportSample::errors`].
    pub errors: Vec<SpecSampleError>,
    /// See [`ReportSample::warnings`].
    pub warnings: Vec<String>,
}

impl ReportSampleBuilder {
    pub fn add_category(&mut self) {
        self.cnt_categories += 1;
    }

    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    pub fn add_matched(&mut self) {
        self.cnt_matched += 1;
    }

    pub fn add_copied(&mut self) {
        self.cnt_copied += 1;
    }

    pub fn add_skipped(&mut self) {
        self.cnt_skipped += 1;
    }

    pub fn add_removed(&mut self) {
        self.cnt_removed += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Add one path-scoped error.
    pub fn add_error(&mut self, category: &str, path: PathBuf, exception: String) {
        self.errors.push(SpecSampleError {
            category: category.to_string(),
            path,
            exception,
        });
    }

    /// Append a finished category outcome.
    pub fn push_category(&mut self, outcome: SpecCategoryOutcome) {
        self.categories.push(outcome);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportSample {
        ReportSample {
            cnt_categories: self.cnt_categories,
            cnt_scanned: self.cnt_scanned,
            cnt_matched: self.cnt_matched,
            cnt_copied: self.cnt_copied,
            cnt_skipped: self.cnt_skipped,
            cnt_removed: self.cnt_removed,
            if_created_destination: self.if_created_destination,
            categories: self.categories,
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}
