use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for load and read operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A file could not be opened or read. Aborts a multi-file operation at
    /// the failing file; earlier files may already have taken effect.
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A line handed directly to the parser was rejected. File-level loading
    /// never surfaces this; malformed lines are skipped there.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Why a single line could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("zero-length line")]
    EmptyLine,
    #[error("can't separate key from value")]
    Separator,
}
