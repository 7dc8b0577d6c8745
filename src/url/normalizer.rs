//! Normalization strategies applied to every match.

use crate::types::LinkMatch;

/// Rewrites a freshly created match into its final URL form.
///
/// A matcher holds exactly one normalizer. Scheme handlers that override
/// [`SchemeHandler::normalize`](crate::core::SchemeHandler::normalize) usually
/// finish by handing the match back to it.
pub trait Normalize: Send + Sync {
    fn normalize(&self, m: &mut LinkMatch);
}

/// The matcher's stock normalization.
///
/// This function:
/// 1. Prepends `http://` to matches without a schema
/// 2. Prepends `mailto:` to e-mail matches that lack it
///
/// Protocol-relative (`//host`) matches are left as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardNormalizer;

impl Normalize for StandardNormalizer {
    fn normalize(&self, m: &mut LinkMatch) {
        if m.schema.is_empty() {
            m.url = format!("http://{}", m.url);
        }

        add_mailto_prefix(m);
    }
}

/// Normalization that records whether the schema had to be synthesized.
///
/// This function:
/// 1. Clears [`LinkMatch::no_schema`]
/// 2. Gives schema-less matches the `http:` schema and flags them
/// 3. Turns protocol-relative `//` matches into `http:` and flags them
/// 4. Prepends `mailto:` to e-mail matches that lack it
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaTaggingNormalizer;

impl Normalize for SchemaTaggingNormalizer {
    fn normalize(&self, m: &mut LinkMatch) {
        m.no_schema = false;

        if m.schema.is_empty() {
            m.schema = "http:".to_string();
            m.url = format!("http://{}", m.url);
            m.no_schema = true;
        }

        if m.schema == "//" {
            m.schema = "http:".to_string();
            m.url = format!("http:{}", m.url);
            m.no_schema = true;
        }

        add_mailto_prefix(m);
    }
}

fn add_mailto_prefix(m: &mut LinkMatch) {
    if m.schema == "mailto:" && !has_mailto_prefix(&m.url) {
        m.url = format!("mailto:{}", m.url);
    }
}

/// Case-insensitive check for a leading `mailto:`.
pub fn has_mailto_prefix(url: &str) -> bool {
    url.get(..7)
        .map(|prefix| prefix.eq_ignore_ascii_case("mailto:"))
        .unwrap_or(false)
}
