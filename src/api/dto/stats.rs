//! DTOs for link statistics.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::stats_service::{DailyCount, DomainCount, StatsSummary};
use crate::domain::entities::Link;
use crate::utils::format::format_click_count;

/// Query parameters for the summary endpoint.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Window of the daily histogram, 1 to 365 days.
    pub days: Option<i64>,
}

/// Public view of a link.
#[derive(Debug, Serialize)]
pub struct LinkStatsResponse {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub description: Option<String>,
    pub click_count: i64,
    pub click_count_display: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl From<Link> for LinkStatsResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            click_count_display: format_click_count(link.click_count),
            short_code: link.code,
            original_url: link.long_url,
            description: link.description,
            click_count: link.click_count,
            created_at: link.created_at,
            last_accessed: link.last_accessed,
            is_active: link.is_active,
        }
    }
}

/// Aggregated statistics over all links.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub total_links: i64,
    pub total_clicks: i64,
    pub total_clicks_display: String,
    pub average_clicks: f64,
    pub days: i64,
    pub popular_domains: Vec<DomainCountItem>,
    pub daily_links: Vec<DailyCountItem>,
    pub top_links: Vec<LinkStatsResponse>,
    pub recent_links: Vec<LinkStatsResponse>,
}

#[derive(Debug, Serialize)]
pub struct DomainCountItem {
    pub domain: String,
    pub links: i64,
}

#[derive(Debug, Serialize)]
pub struct DailyCountItem {
    pub date: NaiveDate,
    pub links: i64,
}

impl From<DomainCount> for DomainCountItem {
    fn from(d: DomainCount) -> Self {
        Self {
            domain: d.domain,
            links: d.links,
        }
    }
}

impl From<DailyCount> for DailyCountItem {
    fn from(d: DailyCount) -> Self {
        Self {
            date: d.date,
            links: d.links,
        }
    }
}

impl SummaryResponse {
    pub fn new(summary: StatsSummary, days: i64) -> Self {
        Self {
            total_links: summary.total_links,
            total_clicks: summary.total_clicks,
            total_clicks_display: format_click_count(summary.total_clicks),
            average_clicks: summary.average_clicks,
            days,
            popular_domains: summary.popular_domains.into_iter().map(Into::into).collect(),
            daily_links: summary.daily_links.into_iter().map(Into::into).collect(),
            top_links: summary.top_links.into_iter().map(Into::into).collect(),
            recent_links: summary.recent_links.into_iter().map(Into::into).collect(),
        }
    }
}
