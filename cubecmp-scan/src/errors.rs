use std::io;
use std::path::PathBuf;
use std::result;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file was read but didn't hold a serialized cube list.
    #[error("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The comparators refused to compare, because a loader produced a malformed cube.
    #[error(transparent)]
    Compare(#[from] cubecmp::Error),

    #[error("{} is not under {}", .0.display(), .1.display())]
    NotUnderBase(PathBuf, PathBuf),
}

impl Error {
    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
