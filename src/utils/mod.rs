//! Short code rules and helpers shared by the services, handlers and CLI.
//!
//! - [`url_validator`] - URL acceptance rules
//! - [`url_normalizer`] - Canonical URL form
//! - [`code_validator`] - Custom code rules
//! - [`code_generator`] - Hash-based and random code generation
//! - [`base_url`] - Base URL from HTTP headers
//! - [`format`] - Display formatting

pub mod base_url;
pub mod code_generator;
pub mod code_validator;
pub mod format;
pub mod url_normalizer;
pub mod url_validator;
