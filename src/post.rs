//! Defines the [`Post`] type and the logic for building posts from rendered
//! source documents: interpreting the metadata map, deriving output file
//! names (including collision disambiguation), parsing publish dates, and
//! precomputing the index and feed fragments.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use log::warn;
use url::Url;

use crate::source::Document;

const HTML_EXTENSION: &str = ".html";

/// The number of title words used to derive an output file name.
const FILE_NAME_WORDS: usize = 4;

/// Date formats accepted for the `published-on` metadata field, tried in
/// order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%m/%d/%Y"];

/// One article, after its raw metadata has been normalized. The index and
/// feed fragments are built here, from the post's own data alone, and are
/// never touched again; the navigation and recommendation fragments depend
/// on the whole collection and belong to [`crate::collection`].
pub struct Post {
    /// The title of the post.
    pub title: String,

    /// The post's tags: trimmed, lowercased, deduplicated. May be empty.
    pub tags: HashSet<String>,

    /// Optional description, used only in the feed fragment.
    pub description: String,

    /// The raw `published-on` token, used verbatim in the feed's
    /// `<pubDate>`.
    pub published_on: String,

    /// The parsed publish date. `None` when `published-on` matched none of
    /// the accepted formats; such posts sort after all dated posts.
    pub publish_date: Option<NaiveDate>,

    /// The output file name, derived from the title (see
    /// [`file_name_stem`]) and disambiguated across the batch.
    pub file_name: String,

    /// The rendered Markdown body.
    pub body: String,

    /// The post's entry in the index page listing.
    pub index_fragment: String,

    /// The post's `<item>` element in the RSS feed.
    pub feed_fragment: String,
}

/// Builds [`Post`]s from rendered documents. The documents are kept in load
/// order; sorting is the collection assembler's job. File-name collisions
/// are resolved across the whole batch (in load order) before any fragment
/// is built; every emitted link uses the final name.
///
/// `site_url` is the absolute base URL under which the output directory is
/// served (e.g. `https://example.org/blog/`); the trailing slash is
/// significant for URL joining.
pub fn build_posts(documents: Vec<Document>, site_url: &Url) -> Result<Vec<Post>> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut named: Vec<(Document, String)> = Vec::with_capacity(documents.len());
    for document in documents {
        let title = require_field(&document, "title")?;
        let stem = file_name_stem(&title);
        let mut candidate = stem.clone();
        let mut n = 1;
        while !taken.insert(candidate.clone()) {
            n += 1;
            candidate = format!("{}_{}", stem, n);
        }
        named.push((document, candidate + HTML_EXTENSION));
    }

    named
        .into_iter()
        .map(|(document, file_name)| build_post(document, file_name, site_url))
        .collect()
}

fn build_post(document: Document, file_name: String, site_url: &Url) -> Result<Post> {
    let title = require_field(&document, "title")?;
    let published_on = require_field(&document, "published-on")?;
    let metadata = &document.rendered.metadata;

    let publish_date = parse_publish_date(&published_on);
    if publish_date.is_none() {
        warn!(
            "article `{}`: unparseable publish date `{}`; it will sort last",
            document.origin, published_on,
        );
    }

    let link = site_url.join(&file_name)?;
    let display_date = match publish_date {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => published_on.clone(),
    };
    let description = metadata.get("description").cloned().unwrap_or_default();

    Ok(Post {
        index_fragment: format!(
            "<li><h4><a href=\"{}\">{}</a><em> &mdash; {}</em></h4></li>",
            link.path(),
            title,
            display_date,
        ),
        feed_fragment: format!(
            "<item><title>{}</title><link>{}</link><description>{}</description>\
             <pubDate>{}</pubDate><guid>{}</guid></item>",
            title, link, description, published_on, link,
        ),
        tags: parse_tags(metadata.get("tags").map(String::as_str).unwrap_or("")),
        description,
        published_on,
        publish_date,
        file_name,
        body: document.rendered.html,
        title,
    })
}

fn require_field(document: &Document, field: &'static str) -> Result<String> {
    match document.rendered.metadata.get(field) {
        Some(value) => Ok(value.clone()),
        None => Err(Error::MissingField {
            origin: document.origin.clone(),
            field,
        }),
    }
}

/// Derives an output file-name stem from a title: the first
/// [`FILE_NAME_WORDS`] whitespace-separated words, each lowercased and
/// slugified to filesystem-safe characters, joined with underscores. Words
/// that slugify to nothing (pure punctuation) are dropped after the
/// truncation, so they still consume one of the slots.
pub fn file_name_stem(title: &str) -> String {
    let words: Vec<String> = title
        .split_whitespace()
        .take(FILE_NAME_WORDS)
        .map(slug::slugify)
        .filter(|w| !w.is_empty())
        .collect();
    match words.is_empty() {
        // A title with no sluggable words still needs a deterministic name.
        true => String::from("untitled"),
        false => words.join("_"),
    }
}

fn parse_publish_date(token: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token.trim(), format).ok())
}

fn parse_tags(tags: &str) -> HashSet<String> {
    tags.split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Represents the result of a post-build operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error building a [`Post`] from a rendered document.
#[derive(Debug)]
pub enum Error {
    /// Returned when a document's metadata is missing a required field
    /// (`title` or `published-on`).
    MissingField {
        origin: String,
        field: &'static str,
    },

    /// Returned when there is a problem joining the post's URL.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingField { origin, field } => {
                write!(f, "article `{}`: missing required field `{}`", origin, field)
            }
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingField { .. } => None,
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator for URL parsing and joining functions.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::render::Rendered;

    #[test]
    fn test_file_name_stem_truncates_to_four_words() {
        assert_eq!(
            file_name_stem("One Two Three Four Five"),
            "one_two_three_four",
        );
    }

    #[test]
    fn test_file_name_stem_sanitizes_punctuation() {
        assert_eq!(file_name_stem("What's New? Rust & Cargo"), "what-s_new_rust");
    }

    #[test]
    fn test_file_name_stem_short_title() {
        assert_eq!(file_name_stem("Hello World"), "hello_world");
    }

    #[test]
    fn test_file_name_stem_empty_title() {
        assert_eq!(file_name_stem("?!"), "untitled");
    }

    #[test]
    fn test_parse_tags_trims_and_lowercases() {
        let expected: HashSet<String> =
            ["rust", "web"].iter().map(|s| s.to_string()).collect();
        assert_eq!(parse_tags(" Rust, Web , rust,"), expected);
    }

    #[test]
    fn test_parse_tags_empty() {
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_build_posts_basic() -> Result<()> {
        let posts = build_posts(
            vec![document(
                "hello",
                &[
                    ("title", "Hello World One"),
                    ("published-on", "2024-01-05"),
                    ("tags", "a, b"),
                    ("description", "A greeting."),
                ],
            )],
            &site_url(),
        )?;
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.file_name, "hello_world_one.html");
        assert_eq!(post.publish_date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert!(post
            .index_fragment
            .contains("href=\"/blog/hello_world_one.html\""));
        assert!(post.index_fragment.contains("January 5, 2024"));
        assert!(post
            .feed_fragment
            .contains("<link>https://example.org/blog/hello_world_one.html</link>"));
        assert!(post
            .feed_fragment
            .contains("<guid>https://example.org/blog/hello_world_one.html</guid>"));
        assert!(post.feed_fragment.contains("<pubDate>2024-01-05</pubDate>"));
        assert!(post
            .feed_fragment
            .contains("<description>A greeting.</description>"));
        Ok(())
    }

    #[test]
    fn test_build_posts_missing_title() {
        let result = build_posts(
            vec![document("untitled", &[("published-on", "2024-01-05")])],
            &site_url(),
        );
        match result {
            Err(Error::MissingField { origin, field }) => {
                assert_eq!(origin, "untitled");
                assert_eq!(field, "title");
            }
            other => panic!("expected missing title, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_build_posts_missing_date() {
        let result = build_posts(
            vec![document("undated", &[("title", "No Date Here")])],
            &site_url(),
        );
        match result {
            Err(Error::MissingField { origin, field }) => {
                assert_eq!(origin, "undated");
                assert_eq!(field, "published-on");
            }
            other => panic!("expected missing date, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_build_posts_unparseable_date_is_kept() -> Result<()> {
        let posts = build_posts(
            vec![document(
                "tbd",
                &[("title", "Coming Soon"), ("published-on", "TBD")],
            )],
            &site_url(),
        )?;
        assert_eq!(posts[0].publish_date, None);
        // The raw token stands in for the display date.
        assert!(posts[0].index_fragment.contains("&mdash; TBD"));
        Ok(())
    }

    #[test]
    fn test_build_posts_long_form_date_accepted() -> Result<()> {
        let posts = build_posts(
            vec![document(
                "long",
                &[("title", "Long Form"), ("published-on", "January 5, 2024")],
            )],
            &site_url(),
        )?;
        assert_eq!(posts[0].publish_date, NaiveDate::from_ymd_opt(2024, 1, 5));
        Ok(())
    }

    #[test]
    fn test_build_posts_disambiguates_collisions() -> Result<()> {
        let posts = build_posts(
            vec![
                document(
                    "first",
                    &[("title", "Same Title"), ("published-on", "2024-01-01")],
                ),
                document(
                    "second",
                    &[("title", "Same Title"), ("published-on", "2024-02-01")],
                ),
            ],
            &site_url(),
        )?;
        assert_eq!(posts[0].file_name, "same_title.html");
        assert_eq!(posts[1].file_name, "same_title_2.html");
        // The disambiguated name flows into the precomputed fragments.
        assert!(posts[1].index_fragment.contains("same_title_2.html"));
        assert!(posts[1].feed_fragment.contains("same_title_2.html"));
        Ok(())
    }

    fn site_url() -> Url {
        Url::parse("https://example.org/blog/").unwrap()
    }

    fn document(origin: &str, fields: &[(&str, &str)]) -> Document {
        Document {
            origin: origin.to_owned(),
            rendered: Rendered {
                html: String::from("<p>body</p>"),
                metadata: fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
        }
    }
}
