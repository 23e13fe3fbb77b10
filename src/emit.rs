//! Substitutes the assembled pages into the page and feed templates and
//! writes the output directory. Rendering and writing are separate steps;
//! the orchestrator ([`crate::build`]) computes every output string before
//! the destructive clear of the output directory.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::info;

use crate::collection::Page;

/// The literal token replaced by page content in the page template.
pub const CONTENT_PLACEHOLDER: &str = "###BLOG#CONTENT###";

/// The literal token replaced by the item list in the feed template.
pub const ITEMS_PLACEHOLDER: &str = "###ITEMS###";

const INDEX_FILE: &str = "index.html";
const FEED_FILE: &str = "rss.xml";

/// One output file, fully rendered and ready to write.
pub struct OutputFile {
    pub name: String,
    pub contents: String,
}

/// Renders pages into output files and writes them to the output directory.
/// Substitution is a literal string replacement of the placeholder token;
/// every occurrence is replaced.
pub struct Emitter<'a> {
    /// The page template; must contain [`CONTENT_PLACEHOLDER`].
    pub page_template: &'a str,

    /// The feed template; must contain [`ITEMS_PLACEHOLDER`].
    pub feed_template: &'a str,

    /// The directory the site is written into. Cleared on every write; the
    /// emitter assumes it owns this directory outright.
    pub output_directory: &'a Path,
}

impl Emitter<'_> {
    /// Renders every output file: one page per post, the index page, and
    /// the feed. Pure string work; nothing touches the filesystem here.
    pub fn render(&self, pages: &[Page]) -> Result<Vec<OutputFile>> {
        let page_template =
            checked_template(self.page_template, "page", CONTENT_PLACEHOLDER)?;
        let feed_template =
            checked_template(self.feed_template, "feed", ITEMS_PLACEHOLDER)?;

        let mut files: Vec<OutputFile> = pages
            .iter()
            .map(|page| OutputFile {
                name: page.post.file_name.clone(),
                contents: page_template.replace(CONTENT_PLACEHOLDER, &page.html),
            })
            .collect();

        let index_fragments: String = pages
            .iter()
            .map(|page| page.post.index_fragment.as_str())
            .collect();
        files.push(OutputFile {
            name: INDEX_FILE.to_owned(),
            contents: page_template.replace(
                CONTENT_PLACEHOLDER,
                &format!("<h3>Posts</h3><ul>{}</ul>", index_fragments),
            ),
        });

        let feed_items: String = pages
            .iter()
            .map(|page| page.post.feed_fragment.as_str())
            .collect();
        files.push(OutputFile {
            name: FEED_FILE.to_owned(),
            contents: feed_template.replace(ITEMS_PLACEHOLDER, &feed_items),
        });

        Ok(files)
    }

    /// Clears the output directory and writes every rendered file. A write
    /// failure aborts mid-run and leaves the directory partially populated;
    /// the next run's clear removes the debris.
    pub fn write(&self, files: &[OutputFile]) -> Result<()> {
        clear_directory(self.output_directory)?;
        for file in files {
            use std::io::Write;
            let path = self.output_directory.join(&file.name);
            info!("writing {}", file.name);
            File::create(&path)
                .and_then(|mut f| f.write_all(file.contents.as_bytes()))
                .map_err(|err| Error::WriteFile { path, err })?;
        }
        Ok(())
    }
}

fn checked_template<'t>(
    template: &'t str,
    kind: &'static str,
    token: &'static str,
) -> Result<&'t str> {
    match template.contains(token) {
        true => Ok(template),
        false => Err(Error::MissingPlaceholder { kind, token }),
    }
}

fn clear_directory(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => (),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (),
        Err(err) => {
            return Err(Error::Clean {
                path: dir.to_owned(),
                err,
            })
        }
    }
    std::fs::create_dir_all(dir).map_err(|err| Error::Clean {
        path: dir.to_owned(),
        err,
    })
}

/// Represents the result of an emit operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering or writing the output files.
#[derive(Debug)]
pub enum Error {
    /// Returned when a template does not contain its placeholder token, so
    /// substitution could never produce content.
    MissingPlaceholder {
        kind: &'static str,
        token: &'static str,
    },

    /// Returned for I/O problems while clearing the output directory.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems writing an output file.
    WriteFile { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingPlaceholder { kind, token } => {
                write!(f, "{} template does not contain `{}`", kind, token)
            }
            Error::Clean { path, err } => {
                write!(f, "Clearing output directory '{}': {}", path.display(), err)
            }
            Error::WriteFile { path, err } => {
                write!(f, "Writing '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingPlaceholder { .. } => None,
            Error::Clean { path: _, err } => Some(err),
            Error::WriteFile { path: _, err } => Some(err),
        }
    }
}
