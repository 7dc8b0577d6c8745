//! The link matcher and its builder.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::grammar::{
    is_delimiter, is_fuzzy_email_start, is_fuzzy_link_start, is_text_separator,
    starts_with_ignore_case, Grammar,
};
use crate::core::scheme::{HttpScheme, MailtoScheme, ProtocolRelativeScheme, SchemeHandler};
use crate::error::LinkifyError;
use crate::types::{LinkMatch, LinkifyOptions};
use crate::url::normalizer::{Normalize, StandardNormalizer};
use crate::url::psl::TldList;

/// A candidate link inside the text currently being scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    schema: String,
    start: usize,
    end: usize,
}

impl Candidate {
    /// Whether `start..end` should replace this candidate: it starts earlier,
    /// or at the same offset and reaches further.
    fn is_beaten_by(&self, start: usize, end: usize) -> bool {
        start < self.start || (start == self.start && end > self.end)
    }
}

fn keep_best(best: &mut Option<Candidate>, schema: &str, start: usize, end: usize) {
    if best.as_ref().map_or(true, |b| b.is_beaten_by(start, end)) {
        *best = Some(Candidate {
            schema: schema.to_string(),
            start,
            end,
        });
    }
}

/// Schema-aware link matcher.
///
/// A matcher owns a table of schemas (each with a [`SchemeHandler`]), a
/// top-level domain list for fuzzy links, and one global [`Normalize`]
/// strategy. It is immutable once built and can be shared between threads.
///
/// # Examples
///
/// ```
/// use linkspan::LinkMatcher;
///
/// let matcher = LinkMatcher::default();
/// let found = matcher.match_links("Read https://docs.rs or example.com");
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].url, "https://docs.rs");
/// assert_eq!(found[1].url, "http://example.com");
/// ```
pub struct LinkMatcher {
    schemes: Vec<(String, Arc<dyn SchemeHandler>)>,
    grammar: Grammar,
    normalizer: Arc<dyn Normalize>,
}

impl LinkMatcher {
    /// Start configuring a matcher from the default schema table.
    pub fn builder() -> LinkMatcherBuilder {
        LinkMatcherBuilder::new()
    }

    /// Find every link in `text`, left to right and without overlaps.
    ///
    /// Returns an empty vector when nothing is found.
    pub fn match_links(&self, text: &str) -> Vec<LinkMatch> {
        let mut matches = Vec::new();
        let mut shift = 0;

        while let Some(candidate) = self.find_first(&text[shift..]) {
            matches.push(self.create_match(&text[shift..], &candidate, shift));
            shift += candidate.end;
        }

        trace!(matches = matches.len(), bytes = text.len(), "scanned text for links");
        matches
    }

    /// Whether `text` contains at least one link.
    pub fn test(&self, text: &str) -> bool {
        self.find_first(text).is_some()
    }

    /// Cheap check that rules out texts which cannot contain a link.
    ///
    /// May report `true` for texts without links; never reports `false` for
    /// texts with one.
    pub fn pretest(&self, text: &str) -> bool {
        let options = self.grammar.options();
        (options.fuzzy_link && text.contains('.'))
            || (options.fuzzy_email && text.contains('@'))
            || self.schemes.iter().any(|(name, _)| {
                text.char_indices()
                    .any(|(i, _)| starts_with_ignore_case(&text[i..], name))
            })
    }

    /// Length of the link body following `schema` at `pos`, or 0 when the
    /// schema is unknown or the body does not validate.
    pub fn test_schema_at(&self, text: &str, schema: &str, pos: usize) -> usize {
        match self.scheme(&schema.to_lowercase()) {
            Some(handler) => handler.validate(text, pos, self),
            None => 0,
        }
    }

    /// Match a schema link that starts at the very beginning of `text`.
    ///
    /// Fuzzy links and e-mails are not considered.
    pub fn match_at_start(&self, text: &str) -> Option<LinkMatch> {
        let (name, handler) = self
            .schemes
            .iter()
            .find(|(name, _)| starts_with_ignore_case(text, name))?;
        let body = handler.validate(text, name.len(), self);
        if body == 0 {
            return None;
        }
        let candidate = Candidate {
            schema: name.clone(),
            start: 0,
            end: name.len() + body,
        };
        Some(self.create_match(text, &candidate, 0))
    }

    /// Apply the global normalizer to a match.
    pub fn normalize(&self, m: &mut LinkMatch) {
        self.normalizer.normalize(m);
    }

    /// Registered schema names in lookup order.
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.schemes.iter().map(|(name, _)| name.as_str())
    }

    /// Whether a schema (lower-case, including its trailing `:`) is registered.
    pub fn has_scheme(&self, name: &str) -> bool {
        self.scheme(name).is_some()
    }

    pub fn tlds(&self) -> &TldList {
        self.grammar.tlds()
    }

    pub fn options(&self) -> LinkifyOptions {
        self.grammar.options()
    }

    /// The link grammar used by the built-in schema handlers.
    pub(crate) fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    fn scheme(&self, name: &str) -> Option<&Arc<dyn SchemeHandler>> {
        self.schemes
            .iter()
            .find(|(registered, _)| registered == name)
            .map(|(_, handler)| handler)
    }

    /// Earliest link in `text`, found in a single left-to-right pass.
    ///
    /// At the first offset where anything matches, a schema link wins unless
    /// a fuzzy link or fuzzy e-mail starting there reaches further.
    fn find_first(&self, text: &str) -> Option<Candidate> {
        let options = self.grammar.options();
        let fuzzy_link = options.fuzzy_link && self.has_scheme("http:");
        let fuzzy_email = options.fuzzy_email && self.has_scheme("mailto:");
        let mut resume = 0;
        let mut prev = None;

        for (i, c) in text.char_indices() {
            let before = prev.replace(c);
            let mut best = self.schema_link_at(text, i, before, &mut resume);

            if fuzzy_link && is_fuzzy_link_start(before, c) {
                if let Some(end) = self.grammar.fuzzy_link_at(text, i) {
                    keep_best(&mut best, "", i, end);
                }
            }
            if fuzzy_email && is_fuzzy_email_start(before) {
                if let Some(end) = self.grammar.fuzzy_email_at(text, i) {
                    keep_best(&mut best, "mailto:", i, end);
                }
            }

            if best.is_some() {
                return best;
            }
        }

        None
    }

    /// Schema link starting at `i`, when a registered schema sits there and
    /// its handler accepts the body that follows.
    ///
    /// A schema must start the text or follow whitespace, punctuation (other
    /// than `_`) or a separator. A rejected schema name moves `resume` past
    /// itself, so it cannot serve as the boundary of the next candidate.
    fn schema_link_at(
        &self,
        text: &str,
        i: usize,
        before: Option<char>,
        resume: &mut usize,
    ) -> Option<Candidate> {
        let boundary = match before {
            None => true,
            Some(p) => {
                i - p.len_utf8() >= *resume
                    && p != '_'
                    && (is_text_separator(p) || is_delimiter(p))
            }
        };
        if !boundary {
            return None;
        }
        let (name, handler) = self
            .schemes
            .iter()
            .find(|(name, _)| starts_with_ignore_case(&text[i..], name))?;

        let body = handler.validate(text, i + name.len(), self);
        if body == 0 {
            *resume = i + name.len();
            return None;
        }
        Some(Candidate {
            schema: name.clone(),
            start: i,
            end: i + name.len() + body,
        })
    }

    fn create_match(&self, text: &str, candidate: &Candidate, shift: usize) -> LinkMatch {
        let mut m = LinkMatch::new(
            candidate.schema.to_lowercase(),
            shift + candidate.start,
            shift + candidate.end,
            &text[candidate.start..candidate.end],
        );
        match self.scheme(&candidate.schema) {
            Some(handler) => handler.normalize(&mut m, self),
            None => self.normalize(&mut m),
        }
        m
    }
}

impl Default for LinkMatcher {
    /// Built-in schemas, the Public Suffix List and the standard normalizer.
    fn default() -> Self {
        Self {
            schemes: default_schemes(),
            grammar: Grammar::new(TldList::public_suffix_list(), LinkifyOptions::default()),
            normalizer: Arc::new(StandardNormalizer),
        }
    }
}

impl fmt::Debug for LinkMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkMatcher")
            .field("schemes", &self.schemes().collect::<Vec<_>>())
            .field("grammar", &self.grammar)
            .finish_non_exhaustive()
    }
}

fn default_schemes() -> Vec<(String, Arc<dyn SchemeHandler>)> {
    let http: Arc<dyn SchemeHandler> = Arc::new(HttpScheme);
    let protocol_relative: Arc<dyn SchemeHandler> = Arc::new(ProtocolRelativeScheme);
    let mailto: Arc<dyn SchemeHandler> = Arc::new(MailtoScheme);
    vec![
        ("http:".to_string(), Arc::clone(&http)),
        ("https:".to_string(), Arc::clone(&http)),
        ("ftp:".to_string(), http),
        ("//".to_string(), protocol_relative),
        ("mailto:".to_string(), mailto),
    ]
}

enum SchemeRule {
    Handler(Arc<dyn SchemeHandler>),
    Alias(String),
    Removed,
}

/// Builder for [`LinkMatcher`].
///
/// Schema changes are applied in call order on top of the default table
/// (`http:`, `https:`, `ftp:`, `//`, `mailto:`). Schema names are matched
/// case-insensitively and stored lower-cased. Nothing is validated until
/// [`build`](Self::build).
pub struct LinkMatcherBuilder {
    options: LinkifyOptions,
    tlds: TldList,
    extra_tlds: Vec<String>,
    rules: Vec<(String, SchemeRule)>,
    normalizer: Arc<dyn Normalize>,
}

impl LinkMatcherBuilder {
    pub fn new() -> Self {
        Self {
            options: LinkifyOptions::default(),
            tlds: TldList::public_suffix_list(),
            extra_tlds: Vec::new(),
            rules: Vec::new(),
            normalizer: Arc::new(StandardNormalizer),
        }
    }

    pub fn options(mut self, options: LinkifyOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the top-level domain list.
    pub fn tlds(mut self, tlds: TldList) -> Self {
        self.tlds = tlds;
        self
    }

    /// Add one top-level domain to the current list.
    pub fn add_tld(mut self, tld: impl Into<String>) -> Self {
        self.extra_tlds.push(tld.into());
        self
    }

    /// Register `name` with its own validate/normalize handler.
    pub fn add_scheme(
        mut self,
        name: impl Into<String>,
        handler: impl SchemeHandler + 'static,
    ) -> Self {
        self.rules
            .push((name.into(), SchemeRule::Handler(Arc::new(handler))));
        self
    }

    /// Register `name` as sharing the handler of the already registered `target`.
    pub fn add_alias(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.rules
            .push((name.into(), SchemeRule::Alias(target.into())));
        self
    }

    /// Disable a schema, including the built-in ones.
    pub fn remove_scheme(mut self, name: impl Into<String>) -> Self {
        self.rules.push((name.into(), SchemeRule::Removed));
        self
    }

    /// Global normalization strategy applied to every match.
    pub fn normalizer(mut self, normalizer: impl Normalize + 'static) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    pub fn build(self) -> Result<LinkMatcher, LinkifyError> {
        let mut tlds = self.tlds;
        for tld in &self.extra_tlds {
            tlds.insert(tld)?;
        }

        let mut schemes = default_schemes();
        for (name, rule) in self.rules {
            let name = validate_schema_name(&name)?;
            match rule {
                SchemeRule::Handler(handler) => upsert(&mut schemes, name, handler),
                SchemeRule::Alias(target) => {
                    let target = target.to_lowercase();
                    let handler = schemes
                        .iter()
                        .find(|(registered, _)| *registered == target)
                        .map(|(_, handler)| Arc::clone(handler))
                        .ok_or_else(|| LinkifyError::UnknownAlias {
                            schema: name.clone(),
                            target,
                        })?;
                    upsert(&mut schemes, name, handler);
                }
                SchemeRule::Removed => schemes.retain(|(registered, _)| *registered != name),
            }
        }

        debug!(
            schemes = schemes.len(),
            fuzzy_link = self.options.fuzzy_link,
            fuzzy_email = self.options.fuzzy_email,
            fuzzy_ip = self.options.fuzzy_ip,
            public_suffixes = tlds.uses_public_suffixes(),
            "compiled link matcher"
        );

        Ok(LinkMatcher {
            schemes,
            grammar: Grammar::new(tlds, self.options),
            normalizer: self.normalizer,
        })
    }
}

impl Default for LinkMatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_schema_name(name: &str) -> Result<String, LinkifyError> {
    if name.is_empty()
        || !name.is_ascii()
        || name
            .chars()
            .any(|c| c.is_ascii_whitespace() || c.is_ascii_control())
    {
        return Err(LinkifyError::InvalidSchema(name.to_string()));
    }
    Ok(name.to_ascii_lowercase())
}

fn upsert(
    schemes: &mut Vec<(String, Arc<dyn SchemeHandler>)>,
    name: String,
    handler: Arc<dyn SchemeHandler>,
) {
    match schemes.iter_mut().find(|(registered, _)| *registered == name) {
        Some(entry) => entry.1 = handler,
        None => schemes.push((name, handler)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_table() {
        let matcher = LinkMatcher::default();
        assert_eq!(
            matcher.schemes().collect::<Vec<_>>(),
            vec!["http:", "https:", "ftp:", "//", "mailto:"]
        );
    }

    #[test]
    fn test_rejected_schema_does_not_serve_as_boundary() {
        let matcher = LinkMatcher::default();
        // "http:" fails (no "//"), so "//" right after it has no boundary.
        assert!(matcher.match_links("http://").is_empty());
        let found = matcher.find_first("ftp:/x //example.com").unwrap();
        assert_eq!(found.schema, "//");
        assert_eq!(found.start, 7);
    }

    #[test]
    fn test_candidate_ordering() {
        let current = Candidate {
            schema: "https:".to_string(),
            start: 5,
            end: 20,
        };
        assert!(current.is_beaten_by(2, 8));
        assert!(current.is_beaten_by(5, 25));
        assert!(!current.is_beaten_by(5, 20));
        assert!(!current.is_beaten_by(6, 30));
    }

    #[test]
    fn test_schema_names_are_lowercased() {
        let matcher = LinkMatcher::builder()
            .add_alias("SFTP:", "HTTP:")
            .build()
            .unwrap();
        assert!(matcher.has_scheme("sftp:"));
        assert_eq!(matcher.test_schema_at("SFTP://host", "SFTP:", 5), 6);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let matcher = LinkMatcher::builder()
            .add_scheme("http:", MailtoScheme)
            .build()
            .unwrap();
        assert_eq!(matcher.schemes().next(), Some("http:"));
        assert_eq!(matcher.test_schema_at("http:a@b.io", "http:", 5), 6);
    }
}
