//! Doctrinal reference text supplied by the author to ground generation.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

/// Extensions read as plain reference text.
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["txt", "md"];

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("unsupported reference file {path}, only .txt and .md files are read")]
    UnsupportedExtension { path: PathBuf },

    #[error("failed to read reference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub fn accepts(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// Reads a reference file's full text. Binary formats are not parsed.
pub fn load_reference_file(path: impl AsRef<Path>) -> Result<String, ReferenceError> {
    let path = path.as_ref();
    if !accepts(path) {
        return Err(ReferenceError::UnsupportedExtension {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|source| ReferenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), chars = text.len(), "loaded reference material");
    Ok(text)
}
