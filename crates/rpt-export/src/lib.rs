//! # rpt-export
//!
//! Turns an [`AnalysisResult`](rpt_core::AnalysisResult) into a portable
//! report bundle.
//!
//! The export runs as a fixed sequence of steps against one
//! [`ReportSink`](rpt_sink::ReportSink):
//! 1. Build the [`IdentityMap`] from the comparisons retained under the cap
//! 2. Copy every referenced submission file to `files/<id>/<relative path>`
//! 3. Let the [`ComparisonWriter`] write one detail document per comparison
//! 4. Write `overview.json`
//! 5. Write `submissionFileIndex.json` (token counts computed in parallel)
//! 6. Write `README.txt` and `options.json`
//! 7. Close the sink, or discard it if any step failed
//!
//! The identity map and the comparison file table are immutable values passed
//! by reference to later steps, so every document resolves IDs the same way.

pub mod collaborators;
pub mod error;
pub mod export;
pub mod files;
pub mod identity;
pub mod index;
pub mod overview;
pub mod paths;

pub use collaborators::{
    ClusteringMapper, ComparisonFileTable, ComparisonWriter, EmptyMetrics, MetricMapper,
    NoClustering,
};
pub use error::ExportError;
pub use export::{ExportSummary, ReportExporter};
pub use identity::IdentityMap;
pub use index::{SubmissionFile, SubmissionFileIndex};
pub use overview::{OverviewReport, ReportVersion, TruncationStats};
