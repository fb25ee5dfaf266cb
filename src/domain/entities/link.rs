//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL with click counters.
///
/// `long_url` holds the normalized form of the submitted URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub description: Option<String>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_accessed: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Link {
    /// Creates a new, never-clicked, active link.
    pub fn new(
        id: i64,
        code: String,
        long_url: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            long_url,
            description,
            click_count: 0,
            created_at,
            last_accessed: None,
            is_active: true,
        }
    }

    /// Records one visit.
    pub fn register_click(&mut self, at: DateTime<Utc>) {
        self.click_count += 1;
        self.last_accessed = Some(at);
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub code: String,
    pub long_url: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "abc123".to_string(),
            "https://example.com/".to_string(),
            None,
            now,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.code, "abc123");
        assert_eq!(link.long_url, "https://example.com/");
        assert_eq!(link.created_at, now);
        assert_eq!(link.click_count, 0);
        assert!(link.last_accessed.is_none());
        assert!(link.is_active);
    }

    #[test]
    fn test_link_register_click() {
        let mut link = Link::new(
            1,
            "code".to_string(),
            "https://example.com/".to_string(),
            Some("Landing page".to_string()),
            Utc::now(),
        );

        let at = Utc::now();
        link.register_click(at);
        link.register_click(at);

        assert_eq!(link.click_count, 2);
        assert_eq!(link.last_accessed, Some(at));
    }
}
