use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the terminal front end. The simulation core itself
/// never fails outward; its fault paths all resolve to a reset.
#[derive(Debug, Error)]
pub enum CubeError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("could not open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
