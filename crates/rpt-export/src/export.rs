//! The report orchestrator.

use std::path::PathBuf;

use rpt_config::OutputConfig;
use rpt_core::AnalysisResult;
use rpt_sink::{JsonEntryExt, ReportSink};

use crate::collaborators::{
    ClusteringMapper, ComparisonFileTable, ComparisonWriter, EmptyMetrics, MetricMapper,
    NoClustering,
};
use crate::error::ExportError;
use crate::files::export_submission_files;
use crate::identity::IdentityMap;
use crate::index::SubmissionFileIndex;
use crate::overview::{OverviewBuilder, TruncationStats};
use crate::paths::{FILE_INDEX_ENTRY, OPTIONS_ENTRY, OVERVIEW_ENTRY, README_ENTRY};

const README_LINES: [&str; 2] = [
    "This is a software plagiarism report generated by the report exporter.",
    "To view the report open the report viewer and drop the generated archive onto the page.",
];

/// What a successful export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub destination: PathBuf,
    /// Number of submissions referenced by the retained comparisons.
    pub submissions: usize,
    pub files_written: usize,
    pub truncation: TruncationStats,
}

/// Writes one report bundle into one sink.
///
/// An exporter is used for exactly one report: [`ReportExporter::export`]
/// consumes it and always closes (or discards) the sink.
pub struct ReportExporter {
    sink: Box<dyn ReportSink>,
    comparison_writer: Box<dyn ComparisonWriter>,
    metrics: Box<dyn MetricMapper>,
    clustering: Box<dyn ClusteringMapper>,
    export_date: Option<String>,
}

impl ReportExporter {
    #[must_use]
    pub fn new(sink: Box<dyn ReportSink>, comparison_writer: Box<dyn ComparisonWriter>) -> Self {
        Self {
            sink,
            comparison_writer,
            metrics: Box::new(EmptyMetrics),
            clustering: Box::new(NoClustering),
            export_date: None,
        }
    }

    /// Open the sink described by `config` and build an exporter on it.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Sink`] if the destination cannot be opened;
    /// nothing has been written at that point.
    pub fn from_config(
        config: &OutputConfig,
        comparison_writer: Box<dyn ComparisonWriter>,
    ) -> Result<Self, ExportError> {
        let sink = rpt_sink::open_sink(config)?;
        Ok(Self::new(sink, comparison_writer))
    }

    #[must_use]
    pub fn with_metric_mapper(mut self, metrics: Box<dyn MetricMapper>) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn with_clustering_mapper(mut self, clustering: Box<dyn ClusteringMapper>) -> Self {
        self.clustering = clustering;
        self
    }

    /// Pin the `dateOfExecution` field instead of reading the local clock.
    #[must_use]
    pub fn with_export_date(mut self, date: impl Into<String>) -> Self {
        self.export_date = Some(date.into());
        self
    }

    /// Write the complete report for `result` and close the sink.
    ///
    /// On failure the sink is discarded before the error is returned, so the
    /// destination never holds a partial bundle.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any step; see [`ExportError`].
    pub fn export(mut self, result: &AnalysisResult) -> Result<ExportSummary, ExportError> {
        tracing::info!(destination = %self.sink.destination().display(), "writing report");

        match self.write_entries(result) {
            Ok(summary) => {
                self.sink.close()?;
                tracing::info!(
                    destination = %summary.destination.display(),
                    submissions = summary.submissions,
                    files = summary.files_written,
                    "report written"
                );
                Ok(summary)
            }
            Err(error) => {
                if let Err(discard_error) = self.sink.discard() {
                    tracing::warn!(%discard_error, "failed to discard partial report");
                }
                tracing::error!(%error, "report export failed");
                Err(error)
            }
        }
    }

    fn write_entries(&mut self, result: &AnalysisResult) -> Result<ExportSummary, ExportError> {
        let ids = IdentityMap::from_result(result)?;
        tracing::debug!(submissions = ids.len(), "built submission identity map");

        let files_written =
            export_submission_files(self.sink.as_mut(), &ids, &result.options().language)?;
        tracing::debug!(files = files_written, "copied submission files");

        let comparison_files = self
            .comparison_writer
            .write_comparison_reports(result.truncated_comparisons(), &ids, self.sink.as_mut())
            .map_err(ExportError::collaborator("comparison reports"))?;
        check_comparison_files(&comparison_files, &ids)?;

        let export_date = self.export_date.clone().unwrap_or_else(local_export_date);
        let (overview, truncation) = OverviewBuilder {
            result,
            ids: &ids,
            comparison_files: &comparison_files,
            metrics: self.metrics.as_ref(),
            clustering: self.clustering.as_ref(),
            export_date: &export_date,
        }
        .build()?;
        self.sink.add_json_entry(OVERVIEW_ENTRY, &overview)?;

        let index = SubmissionFileIndex::build(&ids)?;
        self.sink.add_json_entry(FILE_INDEX_ENTRY, &index)?;

        self.sink.write_string_entry(README_ENTRY, &README_LINES.join("\n"))?;
        self.sink.add_json_entry(OPTIONS_ENTRY, result.options())?;

        Ok(ExportSummary {
            destination: self.sink.destination().to_path_buf(),
            submissions: ids.len(),
            files_written,
            truncation,
        })
    }
}

/// The table may only name submissions that are part of the report.
fn check_comparison_files(
    table: &ComparisonFileTable,
    ids: &IdentityMap,
) -> Result<(), ExportError> {
    let unknown = table
        .iter()
        .flat_map(|(first, seconds)| std::iter::once(first).chain(seconds.keys()))
        .find(|name| !ids.contains_name(name));
    match unknown {
        Some(name) => Err(ExportError::Collaborator {
            step: "comparison reports",
            source: anyhow::anyhow!("file table references unknown submission '{name}'"),
        }),
        None => Ok(()),
    }
}

fn local_export_date() -> String {
    chrono::Local::now().format("%d/%m/%y").to_string()
}
