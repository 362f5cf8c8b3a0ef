//! Detects which freshly fetched posts are genuinely new.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::domain::{Post, RawPost};

/// Compare candidates against the posts already stored for a feed and
/// return only the novel ones, ordered oldest first so that the ids
/// assigned afterwards correlate with recency.
///
/// Equality is structural over `(title, link, description,
/// published_at)`; assigned ids and read state never participate.
pub fn diff<'a, I>(existing: I, candidates: Vec<RawPost>) -> Vec<RawPost>
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut seen: HashSet<_> = existing.into_iter().map(Post::key).collect();

    // Claiming the key as we go also drops duplicates within the batch
    // itself, keeping the per-feed uniqueness invariant intact.
    let novel: Vec<RawPost> = candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.key()))
        .collect();

    sort_by_published(novel)
}

/// Parse a source timestamp. Feeds in the wild carry RFC 2822
/// (`pubDate`), RFC 3339 (Atom), or something close enough for chrono's
/// lenient parser.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| raw.parse::<DateTime<Utc>>().ok())
}

/// Stable ascending sort by parsed `published_at`.
///
/// Posts whose timestamp does not parse are kept (fail-open) at their
/// original relative positions and do not participate in comparisons.
/// Equal timestamps keep candidate order.
pub(crate) fn sort_by_published(posts: Vec<RawPost>) -> Vec<RawPost> {
    let total = posts.len();
    let mut dated: Vec<(DateTime<Utc>, RawPost)> = Vec::with_capacity(total);
    let mut undated: Vec<(usize, RawPost)> = Vec::new();

    for (index, post) in posts.into_iter().enumerate() {
        match parse_published(&post.published_at) {
            Some(ts) => dated.push((ts, post)),
            None => undated.push((index, post)),
        }
    }

    // sort_by_key is stable, so equal timestamps preserve candidate order
    dated.sort_by_key(|(ts, _)| *ts);

    let mut out = Vec::with_capacity(total);
    let mut dated = dated.into_iter();
    let mut undated = undated.into_iter().peekable();

    for slot in 0..total {
        match undated.peek() {
            Some((index, _)) if *index == slot => {
                let (_, post) = undated.next().expect("peeked entry present");
                out.push(post);
            }
            _ => {
                let (_, post) = dated.next().expect("dated entry present");
                out.push(post);
            }
        }
    }

    out
}
