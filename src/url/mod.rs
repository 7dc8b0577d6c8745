//! Domain and URL text handling.
//!
//! This module contains the pieces the matcher consults but does not own:
//! - Top-level domain lookup backed by the Public Suffix List
//! - Normalization strategies that turn raw matches into URLs

pub mod normalizer;
pub mod psl;

// Re-export main functionality
pub use self::normalizer::{
    has_mailto_prefix, Normalize, SchemaTaggingNormalizer, StandardNormalizer,
};
pub use self::psl::TldList;
