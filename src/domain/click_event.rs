//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

/// A visit to a short link, queued for the background worker.
///
/// Redirects answer immediately; the counter update happens later in
/// [`crate::domain::click_worker::run_click_worker`].
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub code: String,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates an event stamped with the current time.
    pub fn new(code: String) -> Self {
        Self {
            code,
            clicked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_creation() {
        let before = Utc::now();
        let event = ClickEvent::new("abc123".to_string());

        assert_eq!(event.code, "abc123");
        assert!(event.clicked_at >= before);
    }
}
