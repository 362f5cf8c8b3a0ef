//! Converts parsed RSS/Atom content into canonical domain records.

use chrono::{DateTime, Utc};
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{Result, TributaryError};
use crate::domain::{FeedMeta, RawPost};

#[derive(Debug, Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw feed body into metadata plus candidate posts.
    ///
    /// A body that does not parse, or that lacks a channel title, is an
    /// invalid feed. Posts keep their timestamps as strings; the diff
    /// engine decides later whether they parse.
    pub fn normalize(&self, body: &[u8]) -> Result<(FeedMeta, Vec<RawPost>)> {
        let feed = parser::parse(body).map_err(|e| TributaryError::InvalidFeed(e.to_string()))?;

        let title = feed
            .title
            .map(|t| decode_html_entities(&t.content).to_string())
            .ok_or_else(|| TributaryError::InvalidFeed("feed has no title".into()))?;

        let meta = FeedMeta {
            title,
            description: feed
                .description
                .map(|d| decode_html_entities(&d.content).to_string())
                .unwrap_or_default(),
            published_at: feed
                .published
                .or(feed.updated)
                .map(render_timestamp)
                .unwrap_or_default(),
        };

        let posts = feed
            .entries
            .into_iter()
            .map(|entry| RawPost {
                title: entry
                    .title
                    .map(|t| decode_html_entities(&t.content).to_string())
                    .unwrap_or_default(),
                link: entry.links.first().map(|l| l.href.clone()).unwrap_or_default(),
                description: entry
                    .summary
                    .map(|s| decode_html_entities(&s.content).to_string())
                    .unwrap_or_default(),
                published_at: entry
                    .published
                    .or(entry.updated)
                    .map(render_timestamp)
                    .unwrap_or_default(),
            })
            .collect();

        Ok((meta, posts))
    }
}

fn render_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc2822()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <description>A test feed</description>
    <item>
      <title>Test Item 1</title>
      <link>https://example.com/item1</link>
      <guid>item-1</guid>
      <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
      <description>This is item 1</description>
    </item>
    <item>
      <title>Test Item 2</title>
      <link>https://example.com/item2</link>
      <guid>item-2</guid>
      <description>This is item 2</description>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Test Feed</title>
  <subtitle>An Atom test feed</subtitle>
  <entry>
    <title>Atom Entry 1</title>
    <link href="https://example.com/atom1"/>
    <id>atom-entry-1</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <summary>This is Atom entry 1</summary>
  </entry>
</feed>"#;

    #[test]
    fn parses_rss() {
        let (meta, posts) = Normalizer::new().normalize(RSS_SAMPLE.as_bytes()).unwrap();

        assert_eq!(meta.title, "Test Feed");
        assert_eq!(meta.description, "A test feed");
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Test Item 1");
        assert_eq!(posts[0].link, "https://example.com/item1");
        assert_eq!(posts[0].description, "This is item 1");
        // pubDate survives as a parseable string
        assert!(crate::diff::parse_published(&posts[0].published_at).is_some());
        // Missing pubDate stays empty rather than failing the feed
        assert!(posts[1].published_at.is_empty());
    }

    #[test]
    fn parses_atom() {
        let (meta, posts) = Normalizer::new().normalize(ATOM_SAMPLE.as_bytes()).unwrap();

        assert_eq!(meta.title, "Atom Test Feed");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Atom Entry 1");
        assert_eq!(posts[0].link, "https://example.com/atom1");
    }

    #[test]
    fn garbage_is_an_invalid_feed() {
        let err = Normalizer::new().normalize(b"<html>nope</html>").unwrap_err();
        assert!(matches!(err, TributaryError::InvalidFeed(_)));
    }

    #[test]
    fn decodes_html_entities() {
        let body = RSS_SAMPLE.replace("Test Feed", "Tips &amp; Tricks");
        let (meta, _) = Normalizer::new().normalize(body.as_bytes()).unwrap();
        assert_eq!(meta.title, "Tips & Tricks");
    }
}
