//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod redirect;
pub mod shorten;
pub mod stats;
pub mod validate;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use stats::{link_stats_handler, summary_handler};
pub use validate::validate_handler;
