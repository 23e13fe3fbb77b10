//! Exports the [`build_site`] function which stitches together the
//! high-level steps of generating the site: loading and rendering the
//! article sources ([`crate::source`]), building post records
//! ([`crate::post`]), assembling the ordered collection
//! ([`crate::collection`]), and emitting the output files
//! ([`crate::emit`]).
//!
//! Side-effect ordering: every page, the index, and the feed are fully
//! rendered and validated before the output directory is cleared.

use std::fmt;
use std::path::{Path, PathBuf};

use log::info;

use crate::collection;
use crate::config::Config;
use crate::emit::{Emitter, Error as EmitError};
use crate::post::{self, Error as BuildError};
use crate::render::Render;
use crate::source::{self, Error as LoadError};

/// Builds the site from a [`Config`] and an injected [`Render`]
/// capability. This calls into [`source::load_documents`],
/// [`post::build_posts`], [`collection::assemble`], and the [`Emitter`],
/// which do the heavy lifting.
pub fn build_site(config: &Config, renderer: &dyn Render) -> Result<()> {
    let documents = source::load_documents(&config.source_directory, renderer)?;
    let posts = post::build_posts(documents, &config.site_url)?;
    info!("loaded {} articles", posts.len());
    let pages = collection::assemble(posts);

    let page_template = read_template(&config.page_template)?;
    let feed_template = read_template(&config.feed_template)?;
    let emitter = Emitter {
        page_template: &page_template,
        feed_template: &feed_template,
        output_directory: &config.output_directory,
    };
    let files = emitter.render(&pages)?;

    // Everything after this point is destructive.
    emitter.write(&files)?;
    Ok(())
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| Error::OpenTemplateFile {
        path: path.to_owned(),
        err,
    })
}

/// Represents the result of a site build.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during loading,
/// post building, template reading, and emitting.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading and rendering article sources.
    Load(LoadError),

    /// Returned for errors building [`crate::post::Post`]s from rendered
    /// documents.
    Build(BuildError),

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors rendering or writing the output files.
    Emit(EmitError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Load(err) => err.fmt(f),
            Error::Build(err) => err.fmt(f),
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::Emit(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Load(err) => Some(err),
            Error::Build(err) => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::Emit(err) => Some(err),
        }
    }
}

impl From<LoadError> for Error {
    /// Converts [`LoadError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: LoadError) -> Error {
        Error::Load(err)
    }
}

impl From<BuildError> for Error {
    /// Converts [`BuildError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: BuildError) -> Error {
        Error::Build(err)
    }
}

impl From<EmitError> for Error {
    /// Converts [`EmitError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: EmitError) -> Error {
        Error::Emit(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::render::MarkdownRenderer;

    const PAGE_TEMPLATE: &str = "<html><body>###BLOG#CONTENT###</body></html>";
    const FEED_TEMPLATE: &str =
        "<rss><channel><title>Blog</title>###ITEMS###</channel></rss>";

    #[test]
    fn test_build_site_round_trip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let config = project(
            dir.path(),
            &[
                (
                    "one.md",
                    "---\ntitle: Hello World One\npublished-on: 2024-01-01\ntags: a, b\n---\nFirst.",
                ),
                (
                    "two.md",
                    "---\ntitle: Hello World Two\npublished-on: 2024-02-01\ntags: b, c\n---\nSecond.",
                ),
            ],
        )?;

        build_site(&config, &MarkdownRenderer)?;

        let index =
            std::fs::read_to_string(config.output_directory.join("index.html"))?;
        let one = std::fs::read_to_string(
            config.output_directory.join("hello_world_one.html"),
        )?;
        let two = std::fs::read_to_string(
            config.output_directory.join("hello_world_two.html"),
        )?;
        let feed = std::fs::read_to_string(config.output_directory.join("rss.xml"))?;

        // Index lists both posts, most recent first.
        let pos_two = index.find("Hello World Two").unwrap();
        let pos_one = index.find("Hello World One").unwrap();
        assert!(pos_two < pos_one);

        // Cross-links: Two's "previous" is One, and each recommends the
        // other through the shared tag "b".
        assert!(two.contains("&#8637; <a href=\"hello_world_one.html\">Hello World One</a>"));
        assert!(one.contains("<a href=\"hello_world_two.html\">Hello World Two</a> &#8640;"));
        assert!(one.contains("blog-recommendations"));

        // Feed carries both items inside the template wrapper, in order.
        assert!(feed.starts_with("<rss>"));
        assert_eq!(feed.matches("<item>").count(), 2);
        assert!(feed.find("Hello World Two").unwrap() < feed.find("Hello World One").unwrap());
        Ok(())
    }

    #[test]
    fn test_build_site_validates_before_clearing(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let config = project(
            dir.path(),
            &[("bad.md", "---\npublished-on: 2024-01-01\n---\nNo title.")],
        )?;
        std::fs::create_dir_all(&config.output_directory)?;
        std::fs::write(config.output_directory.join("previous.html"), "previous run")?;

        let result = build_site(&config, &MarkdownRenderer);
        assert!(matches!(result, Err(Error::Build(_))));

        // The failed run must not have touched the existing output.
        assert!(config.output_directory.join("previous.html").exists());
        Ok(())
    }

    /// Lays out a minimal project under `root` and returns its resolved
    /// configuration.
    fn project(
        root: &std::path::Path,
        articles: &[(&str, &str)],
    ) -> std::io::Result<Config> {
        let source = root.join("_blog_source");
        std::fs::create_dir_all(&source)?;
        std::fs::write(source.join("base.html"), PAGE_TEMPLATE)?;
        std::fs::write(source.join("base_rss.xml"), FEED_TEMPLATE)?;
        for (name, contents) in articles {
            std::fs::write(source.join(name), contents)?;
        }
        Ok(crate::config::Config::from_directory(root).expect("default configuration"))
    }
}
