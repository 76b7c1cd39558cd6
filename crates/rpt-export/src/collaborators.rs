//! Seams for the parts of a report this crate does not compute itself.
//!
//! Comparison detail documents, score distributions and clusters come from
//! the analysis side. They receive the [`IdentityMap`] so any submission they
//! mention is referenced by the same ID as everywhere else in the bundle.

use std::collections::BTreeMap;

use rpt_core::{AnalysisResult, Comparison};
use rpt_sink::ReportSink;
use serde_json::{Value, json};

use crate::identity::IdentityMap;

/// First submission name → second submission name → detail document entry.
pub type ComparisonFileTable = BTreeMap<String, BTreeMap<String, String>>;

/// Writes one detail document per retained comparison.
pub trait ComparisonWriter {
    /// Write the detail documents for `comparisons` into `sink`.
    ///
    /// Returns the entry name of each document, keyed by both submission
    /// names, for the overview.
    ///
    /// # Errors
    ///
    /// Any failure is fatal for the report.
    fn write_comparison_reports(
        &mut self,
        comparisons: &[Comparison],
        ids: &IdentityMap,
        sink: &mut dyn ReportSink,
    ) -> anyhow::Result<ComparisonFileTable>;
}

/// Similarity distributions and the top comparisons shown in the overview.
pub trait MetricMapper {
    /// # Errors
    ///
    /// Any failure is fatal for the report.
    fn distributions(&self, result: &AnalysisResult) -> anyhow::Result<Value>;

    /// # Errors
    ///
    /// Any failure is fatal for the report.
    fn top_comparisons(&self, result: &AnalysisResult, ids: &IdentityMap) -> anyhow::Result<Value>;
}

/// Cluster summaries shown in the overview.
pub trait ClusteringMapper {
    /// # Errors
    ///
    /// Any failure is fatal for the report.
    fn clusters(&self, result: &AnalysisResult, ids: &IdentityMap) -> anyhow::Result<Value>;
}

/// Metric mapper for hosts that do not compute metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyMetrics;

impl MetricMapper for EmptyMetrics {
    fn distributions(&self, _result: &AnalysisResult) -> anyhow::Result<Value> {
        Ok(json!({}))
    }

    fn top_comparisons(&self, _result: &AnalysisResult, _ids: &IdentityMap) -> anyhow::Result<Value> {
        Ok(json!([]))
    }
}

/// Clustering mapper for runs without clustering.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClustering;

impl ClusteringMapper for NoClustering {
    fn clusters(&self, _result: &AnalysisResult, _ids: &IdentityMap) -> anyhow::Result<Value> {
        Ok(json!([]))
    }
}
