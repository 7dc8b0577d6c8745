//! linkspan - find links in free-form text
//!
//! This crate scans text for URLs, e-mail addresses and custom schemes and
//! reports where each link sits together with its normalized URL.
//!
//! # Features
//!
//! - **Schema links**: `http:`, `https:`, `ftp:`, `mailto:`, protocol-relative
//!   `//host`, plus `ssh:`, `git:`, `gemini:` and the other [`COMMON_SCHEMES`]
//! - **Fuzzy links**: bare domains like `example.com/path`, validated against
//!   the Public Suffix List (and `.onion`)
//! - **Fuzzy e-mails**: `user@example.com` becomes `mailto:user@example.com`
//! - **`web+` schemas**: `web+music://track/42` and friends
//! - **Configurable engine**: [`LinkMatcher::builder`] registers schemas,
//!   aliases, TLDs and a normalization strategy
//!
//! # Quick Start
//!
//! ```
//! use linkspan::{find_links, find_links_with_schema};
//!
//! let text = "See example.com or ssh://user@host";
//!
//! let spans = find_links(text);
//! assert_eq!(spans.len(), 2);
//! assert_eq!(spans[0].link, "http://example.com");
//! assert_eq!(&text[spans[0].range()], "example.com");
//!
//! // Only links that were written with a schema
//! let explicit = find_links_with_schema(text);
//! assert_eq!(explicit.len(), 1);
//! assert_eq!(explicit[0].link, "ssh://user@host");
//! ```
//!
//! # Offsets
//!
//! [`LinkSpan::start`] and [`LinkSpan::end`] are byte offsets into the
//! scanned `&str`, so they can be used to slice it directly.
//!
//! # Error Handling
//!
//! Scanning never fails; text without links yields an empty vector.
//! Building a custom [`LinkMatcher`] returns `Result<LinkMatcher, LinkifyError>`.

// Re-export main query functions
pub use self::links::{
    build_link_matcher, find_links, find_links_with_schema, link_matcher, WebPlusScheme,
    COMMON_SCHEMES, ONION_TLD,
};

// Re-export the matching engine
pub use self::core::{
    HttpScheme, LinkMatcher, LinkMatcherBuilder, MailtoScheme, ProtocolRelativeScheme,
    SchemeHandler,
};

// Re-export public types
pub use self::error::LinkifyError;
pub use self::types::{LinkMatch, LinkSpan, LinkifyOptions};
pub use self::url::{
    has_mailto_prefix, Normalize, SchemaTaggingNormalizer, StandardNormalizer, TldList,
};

// Module declarations
pub mod core;
pub mod error;
pub mod links;
pub mod types;
pub mod url;
