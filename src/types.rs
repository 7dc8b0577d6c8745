//! Core data structures for link matching.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::LinkifyError;

/// A link found in a piece of text.
///
/// `start` and `end` are byte offsets into the scanned text, so
/// `&text[span.start..span.end]` is the matched slice. `link` is the
/// normalized URL, which may differ from that slice (for example
/// `example.com` becomes `http://example.com`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkSpan {
    /// Offset of the first byte of the match
    pub start: usize,
    /// Offset one past the last byte of the match
    pub end: usize,
    /// Normalized URL
    pub link: String,
}

impl LinkSpan {
    /// Create a new span.
    pub fn new(start: usize, end: usize, link: impl Into<String>) -> Self {
        Self {
            start,
            end,
            link: link.into(),
        }
    }

    /// Length of the matched slice in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no text. Spans produced by a matcher never are.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Byte range of the match, suitable for slicing the scanned text.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Parse the normalized link with the `url` crate.
    ///
    /// # Examples
    ///
    /// ```
    /// use linkspan::find_links;
    ///
    /// let spans = find_links("docs live at example.com/guide");
    /// let url = spans[0].to_url()?;
    /// assert_eq!(url.host_str(), Some("example.com"));
    /// assert_eq!(url.path(), "/guide");
    /// # Ok::<(), linkspan::LinkifyError>(())
    /// ```
    pub fn to_url(&self) -> Result<Url, LinkifyError> {
        Ok(Url::parse(&self.link)?)
    }
}

impl From<&LinkMatch> for LinkSpan {
    fn from(m: &LinkMatch) -> Self {
        Self::new(m.index, m.last_index, m.url.clone())
    }
}

/// A raw match record produced by the matcher.
///
/// Normalization strategies and scheme handlers mutate `schema`, `url` and
/// `no_schema`; the positional fields are fixed once the match is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// Detected schema, lower-cased (`"https:"`, `"mailto:"`, `"//"`), or
    /// empty for fuzzy links without any schema
    pub schema: String,
    /// Byte offset where the match starts
    pub index: usize,
    /// Byte offset where the match ends (exclusive)
    pub last_index: usize,
    /// The matched slice as it appears in the text
    pub raw: String,
    /// Display text of the link
    pub text: String,
    /// Normalized URL
    pub url: String,
    /// Set when normalization had to synthesize the schema
    pub no_schema: bool,
}

impl LinkMatch {
    /// Create a match whose text and url both start out as the raw slice.
    pub fn new(schema: impl Into<String>, index: usize, last_index: usize, raw: &str) -> Self {
        Self {
            schema: schema.into(),
            index,
            last_index,
            raw: raw.to_string(),
            text: raw.to_string(),
            url: raw.to_string(),
            no_schema: false,
        }
    }
}

/// Switches controlling what the matcher detects besides explicit schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkifyOptions {
    /// Detect links without a schema, like `example.com/path`
    pub fuzzy_link: bool,
    /// Detect e-mail addresses without `mailto:`
    pub fuzzy_email: bool,
    /// Accept bare IPv4 addresses as fuzzy link hosts
    pub fuzzy_ip: bool,
    /// Treat `---` as a long dash that ends a link
    pub triple_dash: bool,
}

impl Default for LinkifyOptions {
    fn default() -> Self {
        Self {
            fuzzy_link: true,
            fuzzy_email: true,
            fuzzy_ip: false,
            triple_dash: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_from_match() {
        let mut m = LinkMatch::new("", 4, 15, "example.com");
        m.url = "http://example.com".to_string();

        let span = LinkSpan::from(&m);
        assert_eq!(span, LinkSpan::new(4, 15, "http://example.com"));
        assert_eq!(span.len(), 11);
        assert_eq!(span.range(), 4..15);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_new_match_copies_raw_text() {
        let m = LinkMatch::new("mailto:", 0, 11, "foo@bar.com");
        assert_eq!(m.raw, "foo@bar.com");
        assert_eq!(m.text, "foo@bar.com");
        assert_eq!(m.url, "foo@bar.com");
        assert!(!m.no_schema);
    }

    #[test]
    fn test_default_options() {
        let options = LinkifyOptions::default();
        assert!(options.fuzzy_link);
        assert!(options.fuzzy_email);
        assert!(!options.fuzzy_ip);
        assert!(!options.triple_dash);
    }

    #[test]
    fn test_span_to_url_rejects_garbage() {
        let span = LinkSpan::new(0, 3, "not a url");
        assert!(matches!(span.to_url(), Err(LinkifyError::UrlParseError(_))));
    }
}
