//! Application layer services implementing business logic.
//!
//! Services consume repository traits and the shortening rules from
//! [`crate::domain`], and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and retrieval
//! - [`services::stats_service::StatsService`] - Per-link and aggregated statistics

pub mod services;
