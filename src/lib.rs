//! The library code for the `mdblog` static blog generator. The
//! architecture is one pipeline of four stages, run strictly in order:
//!
//! 1. Loading article sources from disk and rendering the Markdown through
//!    the injected render capability ([`crate::source`], [`crate::render`])
//! 2. Building normalized post records from the rendered documents,
//!    including derived file names and the precomputed index/feed fragments
//!    ([`crate::post`])
//! 3. Assembling the ordered collection: sorting by publish date and
//!    deriving each post's navigation and recommendation fragments
//!    ([`crate::collection`])
//! 4. Emitting the output files by substituting the assembled content into
//!    the page and feed templates ([`crate::emit`])
//!
//! Of the four, the third stage is where the decisions live: navigation
//! adjacency and recommendation ranking are both defined by the sorted
//! order. The sort is stable and undated posts are pinned to the end.
//!
//! The [`crate::build`] module wires the stages together and owns the one
//! cross-stage rule: the output directory is only cleared after every
//! output string has been rendered and validated.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod collection;
pub mod config;
pub mod emit;
pub mod post;
pub mod render;
pub mod source;
