use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain the forbidden word list while building a [`crate::PatternIndex`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoadError {
    #[error("could not open word list {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read word list: {0}")]
    Read(#[from] io::Error),
}
