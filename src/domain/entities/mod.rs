//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures; the shortening rules live in
//! [`crate::domain::shortening`].
//!
//! - [`Link`] - A shortened URL mapping with its click counters
//! - [`NewLink`] - Input for creating a link

pub mod link;

pub use link::{Link, NewLink};
