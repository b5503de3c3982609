use pal_fs::{FsError, ReadError};
use thiserror::Error;

use crate::bmp::BmpError;

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("expected 768 palette bytes, got {0}")]
    InvalidLength(usize),

    #[error("unknown palette format '{0}'")]
    UnknownFormat(String),

    #[error("read error: {0}")]
    Read(#[from] ReadError),

    #[error("bitmap error: {0}")]
    Bitmap(#[from] BmpError),

    #[error("file system error: {0}")]
    Fs(#[from] FsError),
}

/// Failure to load a palette file, annotated with the requested path.
#[derive(Debug, Error)]
#[error("could not load palette file '{path}': {source}")]
pub struct PaletteLoadError {
    path: String,
    #[source]
    source: PaletteError,
}

impl PaletteLoadError {
    pub fn new(path: impl Into<String>, source: PaletteError) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> &PaletteError {
        &self.source
    }
}
