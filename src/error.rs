use std::{io, path::PathBuf};

/// Errors surfaced by loading, editing and saving a CIT file.
///
/// `Read`/`Write`/`Decompress`/`Compress` are I/O failures; `Parse`/`NotAnObject`
/// mean the file is not a usable CIT document. Either way the operation is aborted
/// and the previously loaded document stays usable.
#[derive(Debug, thiserror::Error)]
pub enum CitError {
    #[error("reading {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("writing {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("gzip decompress")]
    Decompress(#[source] io::Error),

    #[error("gzip compress")]
    Compress(#[source] io::Error),

    #[error("parsing {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("CIT root must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("no {field:?} field can be written at {owner}")]
    StaleReference { owner: String, field: String },

    #[error("another load or save is already in progress")]
    Busy,

    #[error("no city file is loaded")]
    NothingLoaded,

    #[error("load worker for {path:?} exited without a result")]
    WorkerExited { path: PathBuf },
}

impl CitError {
    pub fn is_parse(&self) -> bool {
        matches!(self, CitError::Parse { .. } | CitError::NotAnObject { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(
            self,
            CitError::Read { .. }
                | CitError::Write { .. }
                | CitError::Decompress(_)
                | CitError::Compress(_)
        )
    }
}
