//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`shortening`] - Rules that turn a URL and optional custom code into a short code
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler receives redirect request
//! 2. [`click_event::ClickEvent`] is sent to async channel
//! 3. [`click_worker::run_click_worker`] applies it with retry logic
//! 4. The counter is updated via [`repositories::LinkRepository::record_click`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
pub mod shortening;
