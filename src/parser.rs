//! Parsing GEDCOM-like input into the entity store.
//!
//! Data flows one way: raw lines → tokens ([`tokenizer`]) → entities
//! ([`builder`]). Structural problems in individual lines are recovered by
//! skipping the line; only an unreadable input file is fatal.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::instrument;

/// The entity builder state machine.
pub mod builder;
pub use builder::build;

/// The line tokenizer and tag vocabulary.
pub mod tokenizer;
pub use tokenizer::{Record, Tag, tokenize};

use crate::domain::GedcomStore;

/// Errors that can occur when loading an input file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read '{path}'")]
    Io {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Reads a genealogy file and builds the entity store from it.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file is missing or unreadable. This
/// is the only fatal error in the pipeline; malformed lines inside a
/// readable file are skipped by the builder.
#[instrument]
pub fn load(path: &Path) -> Result<GedcomStore, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(build(text.lines()))
}
