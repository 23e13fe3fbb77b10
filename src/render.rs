//! The Markdown render capability: converts an article source text into
//! rendered HTML plus a metadata map. The capability is expressed as the
//! [`Render`] trait so the loader ([`crate::source`]) takes it as an injected
//! collaborator rather than reaching for a process-global converter.

use std::collections::HashMap;
use std::fmt;

use pulldown_cmark::{html, Options, Parser};

/// The result of rendering one source document: the HTML body and the
/// document's metadata as an uninterpreted string-to-string map. Interpreting
/// the fields (required vs. optional, date parsing, tag splitting) is the
/// job of [`crate::post`].
pub struct Rendered {
    pub html: String,
    pub metadata: HashMap<String, String>,
}

/// The render capability: `text` is the full contents of one source file,
/// including its metadata block.
pub trait Render {
    fn render(&self, text: &str) -> Result<Rendered>;
}

/// Renders articles structured as a YAML metadata block fenced by `---`
/// lines followed by a Markdown body:
///
/// ```md
/// ---
/// title: Hello, world!
/// published-on: 2021-04-16
/// tags: greeting, first
/// ---
/// # Hello
///
/// World
/// ```
pub struct MarkdownRenderer;

impl Render for MarkdownRenderer {
    fn render(&self, text: &str) -> Result<Rendered> {
        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(text)?;
        let metadata: HashMap<String, String> =
            serde_yaml::from_str(&text[yaml_start..yaml_stop])?;

        let mut options = Options::empty();
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut body = String::new();
        html::push_html(&mut body, Parser::new_ext(&text[body_start..], options));
        Ok(Rendered {
            html: body,
            metadata,
        })
    }
}

fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
    const FENCE: &str = "---";
    if !input.starts_with(FENCE) {
        return Err(Error::FrontmatterMissingStartFence);
    }
    match input[FENCE.len()..].find(FENCE) {
        None => Err(Error::FrontmatterMissingEndFence),
        Some(offset) => Ok((
            FENCE.len(),                        // yaml_start
            FENCE.len() + offset,               // yaml_stop
            FENCE.len() + offset + FENCE.len(), // body_start
        )),
    }
}

/// Represents the result of a render operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering a source document.
#[derive(Debug)]
pub enum Error {
    /// Returned when a source file is missing its starting metadata fence
    /// (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a source file is missing its terminal metadata fence
    /// (`---` i.e., the starting fence was found but the ending one was
    /// missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the metadata block as YAML.
    DeserializeYaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Article must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}
