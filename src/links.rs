//! Process-wide link extraction.
//!
//! The shared matcher knows the Public Suffix List plus `onion`, the
//! [`COMMON_SCHEMES`] (each handled like `http:`), the `web+<name>:`
//! pseudo-schemes, and normalizes with [`SchemaTaggingNormalizer`] so that
//! links whose schema had to be synthesized can be filtered out.

use std::sync::LazyLock;

use tracing::debug;

use crate::core::{LinkMatcher, SchemeHandler};
use crate::error::LinkifyError;
use crate::types::{LinkMatch, LinkSpan};
use crate::url::{SchemaTaggingNormalizer, TldList};

/// Schemas recognised in addition to `http:`, `https:`, `ftp:` and `mailto:`.
pub const COMMON_SCHEMES: [&str; 14] = [
    "sftp",
    "smb",
    "file",
    "irc",
    "ircs",
    "svn",
    "git",
    "steam",
    "mumble",
    "ts3server",
    "svn+ssh",
    "ssh",
    "gopher",
    "gemini",
];

/// Accepted as a top-level domain although it is not delegated in DNS.
pub const ONION_TLD: &str = "onion";

static LINK_MATCHER: LazyLock<LinkMatcher> = LazyLock::new(|| {
    let matcher = build_link_matcher().expect("built-in link matcher configuration is valid");
    debug!(schemes = matcher.schemes().count(), "initialised shared link matcher");
    matcher
});

/// `web+<letters>:` followed by an http-style body, as in
/// `web+music://track/42`.
///
/// The schema of a match becomes the text up to and including the first
/// `:` (`web+music:`) before the global normalizer runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebPlusScheme;

impl SchemeHandler for WebPlusScheme {
    fn validate(&self, text: &str, pos: usize, matcher: &LinkMatcher) -> usize {
        let Some(tail) = text.get(pos..) else {
            return 0;
        };
        let letters = tail.bytes().take_while(u8::is_ascii_alphabetic).count();
        if letters == 0 || tail.as_bytes().get(letters) != Some(&b':') {
            return 0;
        }
        let token = letters + 1;

        match matcher.test_schema_at(text, "http:", pos + token) {
            0 => 0,
            body => token + body,
        }
    }

    fn normalize(&self, m: &mut LinkMatch, matcher: &LinkMatcher) {
        let schema_end = m.text.find(':').map(|i| i + 1).unwrap_or(0);
        m.schema = m.text[..schema_end].to_string();
        matcher.normalize(m);
    }
}

/// Build a matcher with the link extraction configuration.
///
/// [`find_links`] and [`find_links_with_schema`] share one instance of it;
/// this constructor is for callers that want their own.
pub fn build_link_matcher() -> Result<LinkMatcher, LinkifyError> {
    let mut builder = LinkMatcher::builder()
        .tlds(TldList::public_suffix_list())
        .add_tld(ONION_TLD)
        .normalizer(SchemaTaggingNormalizer);

    for scheme in COMMON_SCHEMES {
        builder = builder.add_alias(format!("{scheme}:"), "http:");
    }

    builder.add_scheme("web+", WebPlusScheme).build()
}

/// The shared, lazily built matcher behind [`find_links`].
pub fn link_matcher() -> &'static LinkMatcher {
    &LINK_MATCHER
}

/// Find every link in `text`.
///
/// Links without a schema get one (`example.com` → `http://example.com`,
/// `foo@bar.com` → `mailto:foo@bar.com`). Spans are ordered and never
/// overlap; text without links yields an empty vector.
///
/// # Examples
///
/// ```
/// use linkspan::find_links;
///
/// let spans = find_links("mirror at example.com, source on ssh://git@host");
/// assert_eq!(spans.len(), 2);
/// assert_eq!(spans[0].link, "http://example.com");
/// assert_eq!(spans[1].link, "ssh://git@host");
/// ```
pub fn find_links(text: &str) -> Vec<LinkSpan> {
    LINK_MATCHER
        .match_links(text)
        .iter()
        .map(LinkSpan::from)
        .collect()
}

/// Find the links in `text` that carry an explicit schema.
///
/// Like [`find_links`], but leaves out links whose schema was synthesized:
/// bare domains and protocol-relative `//host` links.
///
/// # Examples
///
/// ```
/// use linkspan::find_links_with_schema;
///
/// let spans = find_links_with_schema("example.com vs https://example.com");
/// assert_eq!(spans.len(), 1);
/// assert_eq!(spans[0].start, 15);
/// ```
pub fn find_links_with_schema(text: &str) -> Vec<LinkSpan> {
    LINK_MATCHER
        .match_links(text)
        .iter()
        .filter(|m| !m.no_schema)
        .map(LinkSpan::from)
        .collect()
}
