//! Loads article source files from disk and renders them through the
//! injected [`Render`] capability. Enumeration order is whatever the
//! filesystem returns; nothing downstream may rely on it beyond tie-breaking
//! (see [`crate::collection`]).

use std::fmt;
use std::fs::{read_dir, File};
use std::path::{Path, PathBuf};

use crate::render::{Render, Rendered};

const MARKDOWN_EXTENSION: &str = ".md";

/// One rendered source document: the origin identifier (the source file's
/// base name, used in error messages and collision disambiguation), the
/// rendered HTML body, and the raw metadata map.
pub struct Document {
    pub origin: String,
    pub rendered: Rendered,
}

/// Searches `source_directory` for article files (extension = `.md`) and
/// renders each with `renderer`. A file that cannot be read or rendered
/// fails the whole load; there is no silent skipping.
pub fn load_documents(
    source_directory: &Path,
    renderer: &dyn Render,
) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for result in read_dir(source_directory)
        .map_err(|err| Error::ListDirectory {
            path: source_directory.to_owned(),
            err,
        })?
    {
        let entry = result?;
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if file_name.ends_with(MARKDOWN_EXTENSION) {
            let origin = file_name.trim_end_matches(MARKDOWN_EXTENSION);
            documents.push(load_document(origin, &entry.path(), renderer)?);
        }
    }
    Ok(documents)
}

fn load_document(
    origin: &str,
    path: &Path,
    renderer: &dyn Render,
) -> Result<Document> {
    use std::io::Read;
    let annotate = |e: Error| {
        Error::Annotated(format!("loading article `{}`", path.display()), Box::new(e))
    };

    let mut contents = String::new();
    File::open(path)
        .and_then(|mut f| f.read_to_string(&mut contents))
        .map_err(|e| annotate(Error::Io(e)))?;
    let rendered = renderer.render(&contents).map_err(|e| annotate(e.into()))?;
    Ok(Document {
        origin: origin.to_owned(),
        rendered,
    })
}

/// Represents the result of a document-load operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading an article source document.
#[derive(Debug)]
pub enum Error {
    /// Returned when the source directory itself cannot be listed.
    ListDirectory { path: PathBuf, err: std::io::Error },

    /// Returned when a source document fails to render.
    Render(crate::render::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ListDirectory { path, err } => {
                write!(f, "Listing source directory '{}': {}", path.display(), err)
            }
            Error::Render(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ListDirectory { path: _, err } => Some(err),
            Error::Render(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<crate::render::Error> for Error {
    /// Converts a [`crate::render::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator around the render capability.
    fn from(err: crate::render::Error) -> Error {
        Error::Render(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
