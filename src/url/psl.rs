//! Top-level domain list backed by the Public Suffix List.

use std::collections::BTreeSet;

use psl::{List, Psl};

use crate::error::LinkifyError;

/// The set of suffixes a fuzzy link host may end with.
///
/// The list either consults the Public Suffix List or is limited to an
/// explicit set; extra suffixes (like `onion`) can be added to both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TldList {
    public_suffixes: bool,
    extra: BTreeSet<String>,
}

impl TldList {
    /// Every top-level domain known to the Public Suffix List.
    pub fn public_suffix_list() -> Self {
        Self {
            public_suffixes: true,
            extra: BTreeSet::new(),
        }
    }

    /// Only the given top-level domains.
    pub fn from_tlds<I, S>(tlds: I) -> Result<Self, LinkifyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self {
            public_suffixes: false,
            extra: BTreeSet::new(),
        };
        for tld in tlds {
            list.insert(tld.as_ref())?;
        }
        Ok(list)
    }

    /// Add a single top-level domain, keeping the existing ones.
    pub fn insert(&mut self, tld: &str) -> Result<(), LinkifyError> {
        validate_tld(tld)?;
        self.extra.insert(tld.to_lowercase());
        Ok(())
    }

    /// Whether the list consults the Public Suffix List.
    pub fn uses_public_suffixes(&self) -> bool {
        self.public_suffixes
    }

    /// Explicitly added top-level domains, lower-cased.
    pub fn extra(&self) -> impl Iterator<Item = &str> {
        self.extra.iter().map(String::as_str)
    }

    /// Check whether a host label is a known top-level domain (case-insensitive).
    pub fn contains(&self, label: &str) -> bool {
        if label.is_empty() {
            return false;
        }
        let label = label.to_lowercase();
        self.extra.contains(&label) || (self.public_suffixes && is_public_tld(&label))
    }
}

impl Default for TldList {
    fn default() -> Self {
        Self::public_suffix_list()
    }
}

fn validate_tld(tld: &str) -> Result<(), LinkifyError> {
    if tld.is_empty() || tld.contains('.') || tld.chars().any(char::is_whitespace) {
        return Err(LinkifyError::InvalidTld(tld.to_string()));
    }
    Ok(())
}

/// Look the label up as the rightmost label of a probe name, falling back to
/// the punycode form for internationalized labels.
fn is_public_tld(label: &str) -> bool {
    if is_known_suffix(label) {
        return true;
    }
    if label.is_ascii() {
        return false;
    }
    match idna::domain_to_ascii(label) {
        Ok(ascii) => is_known_suffix(&ascii),
        Err(_) => false,
    }
}

fn is_known_suffix(label: &str) -> bool {
    let probe = format!("probe.{label}");
    List.suffix(probe.as_bytes())
        .map(|suffix| suffix.is_known())
        .unwrap_or(false)
}
