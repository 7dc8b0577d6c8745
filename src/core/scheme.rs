//! Schema handlers: the validate/normalize pair registered for each schema.

use crate::core::matcher::LinkMatcher;
use crate::types::LinkMatch;

/// Validation and normalization for one registered schema.
///
/// `validate` is called with `pos` pointing right after the schema name
/// (`"http:"`, `"//"`, `"web+"`, …) and returns how many bytes of link body
/// follow, or 0 to reject the candidate. `normalize` runs on every accepted
/// match and defaults to the matcher's global normalizer.
///
/// # Examples
///
/// ```
/// use linkspan::{LinkMatch, LinkMatcher, SchemeHandler};
///
/// struct Ticket;
///
/// impl SchemeHandler for Ticket {
///     fn validate(&self, text: &str, pos: usize, _matcher: &LinkMatcher) -> usize {
///         text[pos..].bytes().take_while(u8::is_ascii_digit).count()
///     }
/// }
///
/// let matcher = LinkMatcher::builder().add_scheme("ticket:", Ticket).build()?;
/// let found = matcher.match_links("see ticket:1234");
/// assert_eq!(found[0].url, "ticket:1234");
/// # Ok::<(), linkspan::LinkifyError>(())
/// ```
pub trait SchemeHandler: Send + Sync {
    fn validate(&self, text: &str, pos: usize, matcher: &LinkMatcher) -> usize;

    fn normalize(&self, m: &mut LinkMatch, matcher: &LinkMatcher) {
        matcher.normalize(m);
    }
}

/// `http:`-style schemas: `//`, optional credentials, host, port and path.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpScheme;

impl SchemeHandler for HttpScheme {
    fn validate(&self, text: &str, pos: usize, matcher: &LinkMatcher) -> usize {
        matcher.grammar().http_body(text, pos)
    }
}

/// Protocol-relative links (`//example.com/path`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolRelativeScheme;

impl SchemeHandler for ProtocolRelativeScheme {
    fn validate(&self, text: &str, pos: usize, matcher: &LinkMatcher) -> usize {
        matcher.grammar().protocol_relative_body(text, pos)
    }
}

/// `mailto:` followed by an e-mail address.
#[derive(Debug, Clone, Copy, Default)]
pub struct MailtoScheme;

impl SchemeHandler for MailtoScheme {
    fn validate(&self, text: &str, pos: usize, matcher: &LinkMatcher) -> usize {
        matcher.grammar().mailto_body(text, pos)
    }
}
