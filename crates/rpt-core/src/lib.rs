//! # rpt-core
//!
//! Domain model for the report exporter.
//!
//! These types describe the output of an analysis run as the exporter sees it:
//! - Submissions with their files and per-file token counts
//! - Scored comparisons between two submissions
//! - The run options snapshot, including the active language descriptor
//! - The analysis result bundling comparisons, options, and run duration
//!
//! The exporter never mutates any of these; they are produced by the analysis
//! engine and handed over read-only.

pub mod errors;
pub mod language;
pub mod options;
pub mod result;
pub mod submission;

pub use errors::CoreError;
pub use language::LanguageDescriptor;
pub use options::RunOptions;
pub use result::{AnalysisResult, Comparison};
pub use submission::Submission;
