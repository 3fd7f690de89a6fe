use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure modes of report writing.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The output target could not be acquired; nothing was written.
    #[error("when opening report output '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing failed mid-stream; the partial output is left in place.
    #[error("when writing xml report: {0}")]
    Write(#[from] io::Error),
}
