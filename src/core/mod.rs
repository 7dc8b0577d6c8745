//! Core link matching functionality.
//!
//! This module contains the matching engine:
//! - The schema table and scanning loop
//! - Schema handlers (validate/normalize pairs)
//! - The link grammar shared by the built-in handlers

pub(crate) mod grammar;
pub mod matcher;
pub mod scheme;

// Re-export main functionality
pub use matcher::{LinkMatcher, LinkMatcherBuilder};
pub use scheme::{HttpScheme, MailtoScheme, ProtocolRelativeScheme, SchemeHandler};
