//! Orders the built posts and derives each post's final page body. The
//! assembler is a pure transformation: sort, then append the navigation
//! fragment, then append the recommendation fragment. The sorted order
//! decides navigation adjacency and the index/feed item order; the sort is
//! stable and undated posts always land at the end.

use std::cmp::Ordering;

use crate::post::Post;

/// The number of recommended posts shown under an article.
const MAX_RECOMMENDATIONS: usize = 2;

/// A post together with its final page body (rendered article body plus
/// navigation and recommendation fragments, in that order).
pub struct Page {
    pub post: Post,
    pub html: String,
}

/// Sorts posts by publish date (most recent first) and derives each post's
/// page body. Ties and unparseable dates keep their load order; unparseable
/// dates sort after every dated post.
pub fn assemble(mut posts: Vec<Post>) -> Vec<Page> {
    posts.sort_by(compare_publish_dates);

    let bodies: Vec<String> = posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let mut html = post.body.clone();
            html.push_str(&navigation_fragment(&posts, i));
            html.push_str(&recommendation_fragment(&posts, i));
            html
        })
        .collect();

    posts
        .into_iter()
        .zip(bodies)
        .map(|(post, html)| Page { post, html })
        .collect()
}

fn compare_publish_dates(a: &Post, b: &Post) -> Ordering {
    match (a.publish_date, b.publish_date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Renders the previous/next footer for the post at `index` in the sorted
/// collection. "Next" is the more recent neighbor (`index - 1`), "previous"
/// the older one (`index + 1`); either link is empty at the collection
/// boundary.
fn navigation_fragment(posts: &[Post], index: usize) -> String {
    let next = match index.checked_sub(1) {
        Some(i) => format!(
            "<a href=\"{}\">{}</a> &#8640;",
            posts[i].file_name, posts[i].title,
        ),
        None => String::new(),
    };
    let previous = match posts.get(index + 1) {
        Some(older) => format!(
            "&#8637; <a href=\"{}\">{}</a>",
            older.file_name, older.title,
        ),
        None => String::new(),
    };
    format!(
        "<div id=\"blog-footer\"><div>{}</div> <div>{}</div></div>",
        previous, next,
    )
}

/// Renders the "You may also like" block for the post at `index`: every
/// other post scored by shared-tag count, zero-overlap candidates dropped,
/// the rest sorted by descending score (ties keep collection order), and at
/// most [`MAX_RECOMMENDATIONS`] kept. No block is emitted when nothing
/// overlaps.
fn recommendation_fragment(posts: &[Post], index: usize) -> String {
    let post = &posts[index];
    let mut candidates: Vec<(usize, &Post)> = posts
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, other)| (post.tags.intersection(&other.tags).count(), other))
        .filter(|(shared, _)| *shared > 0)
        .collect();
    candidates.sort_by(|(a, _), (b, _)| b.cmp(a));

    let items: String = candidates
        .iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(_, other)| {
            format!("<li><a href=\"{}\">{}</a></li>", other.file_name, other.title)
        })
        .collect();
    match items.is_empty() {
        true => String::new(),
        false => format!(
            "<div id=\"blog-recommendations\"><h4>You may also like ... </h4><ul>{}</ul></div>",
            items,
        ),
    }
}
