//! Export error types.
//!
//! Every variant is fatal for the report being written. The orchestrator
//! discards the sink before handing the error back.

use std::path::PathBuf;

use rpt_config::ConfigError;
use rpt_sink::SinkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Two different submissions share one name.
    #[error("submission name '{name}' is used by more than one submission")]
    DuplicateSubmissionName { name: String },

    #[error("submission '{submission}' is missing file {}", path.display())]
    MissingSubmissionFile { submission: String, path: PathBuf },

    /// The file would land outside `files/<id>/` in the bundle.
    #[error("file {} of submission '{submission}' is not inside its root", path.display())]
    FileOutsideRoot { submission: String, path: PathBuf },

    /// A comparison writer or mapper failed.
    #[error("{step} failed: {source}")]
    Collaborator {
        step: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ExportError {
    pub(crate) fn collaborator(step: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Collaborator { step, source }
    }
}
