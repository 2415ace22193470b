use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::FileName;

/// Error type for catalog, annotation build, and transform failures.
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("'{0}' does not exist")]
    NotFound(PathBuf),
    #[error("file '{name}' has no entry in the label assignment")]
    MissingLabel { name: FileName },
    #[error("path '{0}' does not match any configured class")]
    UnclassifiedPath(PathBuf),
    #[error("cannot draw {requested} distinct names from [0, {max_name_value}]")]
    InsufficientRange { requested: usize, max_name_value: u32 },
    #[error("sample count {requested} does not match the {available} available source files")]
    SampleCountMismatch { requested: usize, available: usize },
    #[error("annotation write failed after {written} records")]
    Write {
        written: usize,
        #[source]
        source: io::Error,
    },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
