// src/engine/io.rs
//
// I/O: Source enum and file loading.

use crate::error::ImgFlipError;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Image source - in-memory data, memory-mapped files, or file paths (lazy loading)
#[derive(Clone, Debug)]
pub enum Source {
    /// In-memory image data
    Memory(Arc<Vec<u8>>),
    /// Memory-mapped file (zero-copy access)
    Mapped(Arc<Mmap>),
    /// File path; decoded by streaming from the file when needed
    Path(PathBuf),
}

impl Source {
    /// Memory-map a file.
    pub fn map(path: impl AsRef<Path>) -> std::result::Result<Self, ImgFlipError> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();
        let file = File::open(path).map_err(|e| ImgFlipError::from_open_error(path_str.clone(), e))?;

        // Safety: the file must not be modified externally while mapped.
        // If it is, decoding may fail or the OS may raise SIGBUS.
        let mmap = unsafe { Mmap::map(&file).map_err(|e| ImgFlipError::mmap_failed(path_str, e))? };
        Ok(Source::Mapped(Arc::new(mmap)))
    }

    /// Length of the source data. Path sources query file metadata.
    pub fn byte_len(&self) -> std::result::Result<u64, ImgFlipError> {
        match self {
            Source::Memory(data) => Ok(data.len() as u64),
            Source::Mapped(mmap) => Ok(mmap.len() as u64),
            Source::Path(path) => std::fs::metadata(path)
                .map(|m| m.len())
                .map_err(|e| ImgFlipError::from_open_error(path.to_string_lossy().to_string(), e)),
        }
    }
}

impl From<Vec<u8>> for Source {
    fn from(data: Vec<u8>) -> Self {
        Source::Memory(Arc::new(data))
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}
