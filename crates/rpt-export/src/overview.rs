//! `overview.json`: run metadata, the ID table and summary metrics.

use std::collections::BTreeMap;

use rpt_core::AnalysisResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collaborators::{ClusteringMapper, ComparisonFileTable, MetricMapper};
use crate::error::ExportError;
use crate::identity::IdentityMap;

/// Version of the exporter that wrote the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ReportVersion {
    #[must_use]
    pub fn current() -> Self {
        Self {
            major: env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or_default(),
            minor: env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or_default(),
            patch: env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or_default(),
        }
    }
}

/// How many comparisons made it into the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationStats {
    pub total: usize,
    pub shown: usize,
    pub missing: usize,
}

impl TruncationStats {
    #[must_use]
    pub const fn new(total: usize, cap: usize) -> Self {
        let shown = if total < cap { total } else { cap };
        Self {
            total,
            shown,
            missing: total.saturating_sub(cap),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewReport {
    pub report_version: ReportVersion,
    /// Current submission directories, then old ones.
    pub submission_folder_path: Vec<String>,
    /// Name of the base code directory, `""` without base code.
    pub base_code_folder_path: String,
    pub language: String,
    pub file_extensions: Vec<String>,
    /// Submission ID → submission name.
    pub submission_ids: BTreeMap<String, String>,
    pub submission_ids_to_comparison_file_name: ComparisonFileTable,
    /// Always empty; the analysis side does not report failures yet.
    pub failed_submission_names: Vec<String>,
    pub excluded_files: Vec<String>,
    pub match_sensitivity: u32,
    /// `dd/mm/yy`, local clock at export time.
    pub date_of_execution: String,
    /// Analysis duration in milliseconds.
    pub execution_time: u64,
    pub distributions: Value,
    pub top_comparisons: Value,
    pub clusters: Value,
    /// Number of comparisons before truncation.
    pub total_comparisons: usize,
}

/// Inputs the overview is assembled from.
pub struct OverviewBuilder<'a> {
    pub result: &'a AnalysisResult,
    pub ids: &'a IdentityMap,
    pub comparison_files: &'a ComparisonFileTable,
    pub metrics: &'a dyn MetricMapper,
    pub clustering: &'a dyn ClusteringMapper,
    pub export_date: &'a str,
}

impl OverviewBuilder<'_> {
    /// Assemble the overview document.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Collaborator`] if a metric or clustering mapper
    /// fails.
    pub fn build(&self) -> Result<(OverviewReport, TruncationStats), ExportError> {
        let options = self.result.options();
        let truncation = TruncationStats::new(
            self.result.all_comparisons().len(),
            options.maximum_number_of_comparisons,
        );
        tracing::info!(
            total = truncation.total,
            shown = truncation.shown,
            missing = truncation.missing,
            "comparisons in report"
        );

        let distributions = self
            .metrics
            .distributions(self.result)
            .map_err(ExportError::collaborator("distribution metrics"))?;
        let top_comparisons = self
            .metrics
            .top_comparisons(self.result, self.ids)
            .map_err(ExportError::collaborator("top comparisons"))?;
        let clusters = self
            .clustering
            .clusters(self.result, self.ids)
            .map_err(ExportError::collaborator("clustering"))?;

        let overview = OverviewReport {
            report_version: ReportVersion::current(),
            submission_folder_path: options
                .all_submission_directories()
                .map(|dir| dir.to_string_lossy().into_owned())
                .collect(),
            base_code_folder_path: options.base_code_name(),
            language: options.language.name.clone(),
            file_extensions: options.file_suffixes().to_vec(),
            submission_ids: self.ids.id_to_name().clone(),
            submission_ids_to_comparison_file_name: self.comparison_files.clone(),
            failed_submission_names: Vec::new(),
            excluded_files: options.excluded_files.clone(),
            match_sensitivity: options.minimum_token_match,
            date_of_execution: self.export_date.to_string(),
            execution_time: self.result.duration_ms(),
            distributions,
            top_comparisons,
            clusters,
            total_comparisons: truncation.total,
        };
        Ok((overview, truncation))
    }
}
