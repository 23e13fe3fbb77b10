//! Project configuration. A `blog.yaml` file is looked up in the project
//! directory or any of its ancestors; every field has a default, so a
//! project with no configuration file at all gets the conventional layout
//! (`_blog_source/` in, `blog/` out, templates next to the articles).

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

const PROJECT_FILE: &str = "blog.yaml";

/// The on-disk shape of `blog.yaml`. All fields are optional; paths are
/// interpreted relative to the project root (the directory holding the
/// configuration file).
#[derive(Deserialize, Default)]
struct ProjectFile {
    source_directory: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    page_template: Option<PathBuf>,
    feed_template: Option<PathBuf>,
    site_url: Option<Url>,
}

/// Resolved configuration for one generator run.
pub struct Config {
    /// The directory holding the Markdown articles.
    pub source_directory: PathBuf,

    /// The directory the site is written into. Owned by the generator and
    /// cleared on every run.
    pub output_directory: PathBuf,

    /// The page template file; its contents must contain
    /// [`crate::emit::CONTENT_PLACEHOLDER`].
    pub page_template: PathBuf,

    /// The feed template file; its contents must contain
    /// [`crate::emit::ITEMS_PLACEHOLDER`].
    pub feed_template: PathBuf,

    /// The absolute URL under which the output directory is served. Used
    /// for feed links; always normalized to end in a slash because
    /// [`Url::join`] treats a slashless last segment as a file name and
    /// replaces it.
    pub site_url: Url,
}

impl Config {
    /// Looks for `blog.yaml` in `dir` or the nearest ancestor that has one
    /// and resolves the configuration against that directory. When no
    /// project file exists anywhere up the tree, `dir` itself is taken as
    /// the project root with all defaults.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        for ancestor in dir.ancestors() {
            let path = ancestor.join(PROJECT_FILE);
            if path.is_file() {
                return Config::from_project_file(&path, ancestor);
            }
        }
        Config::resolve(ProjectFile::default(), dir)
    }

    /// Loads configuration from an explicit project file, resolving
    /// relative paths against `project_root`.
    pub fn from_project_file(path: &Path, project_root: &Path) -> Result<Config> {
        let file = File::open(path).map_err(|err| Error::OpenProjectFile {
            path: path.to_owned(),
            err,
        })?;
        let project: ProjectFile = serde_yaml::from_reader(file)?;
        Config::resolve(project, project_root)
    }

    fn resolve(project: ProjectFile, root: &Path) -> Result<Config> {
        let source_directory = root.join(
            project
                .source_directory
                .unwrap_or_else(|| PathBuf::from("_blog_source")),
        );
        let page_template = match project.page_template {
            Some(path) => root.join(path),
            None => source_directory.join("base.html"),
        };
        let feed_template = match project.feed_template {
            Some(path) => root.join(path),
            None => source_directory.join("base_rss.xml"),
        };
        let site_url = ensure_trailing_slash(match project.site_url {
            Some(url) => url,
            None => Url::parse("https://example.org/blog/")?,
        });
        Ok(Config {
            output_directory: root.join(
                project
                    .output_directory
                    .unwrap_or_else(|| PathBuf::from("blog")),
            ),
            source_directory,
            page_template,
            feed_template,
            site_url,
        })
    }
}

fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Represents the result of loading configuration.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the project configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems opening the project file.
    OpenProjectFile { path: PathBuf, err: std::io::Error },

    /// Returned when the project file is not valid YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when a configured URL cannot be parsed.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenProjectFile { path, err } => {
                write!(f, "Opening project file '{}': {}", path.display(), err)
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenProjectFile { path: _, err } => Some(err),
            Error::DeserializeYaml(err) => Some(err),
            Error::UrlParse(err) => Some(err),
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

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to
    /// use the `?` operator for URL parsing functions.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}
