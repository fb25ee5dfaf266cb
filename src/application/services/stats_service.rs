//! Link statistics service.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::json;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::url_normalizer::domain_of;

/// Default window for daily creation counts.
pub const DEFAULT_STATS_DAYS: i64 = 30;

/// Number of entries in the top and recent link lists.
pub const TOP_LINKS_LIMIT: usize = 10;

/// Links sharing a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCount {
    pub domain: String,
    pub links: i64,
}

/// Links created on one UTC day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub links: i64,
}

/// Aggregated statistics over all active links.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub total_links: i64,
    pub total_clicks: i64,
    pub average_clicks: f64,
    pub popular_domains: Vec<DomainCount>,
    pub daily_links: Vec<DailyCount>,
    pub top_links: Vec<Link>,
    pub recent_links: Vec<Link>,
}

/// Service for link statistics.
pub struct StatsService<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
}

impl<L: LinkRepository + ?Sized> StatsService<L> {
    /// Creates a new statistics service.
    pub fn new(repository: Arc<L>) -> Self {
        Self { repository }
    }

    /// Retrieves the record of a single short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active link matches the code.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn link_stats(&self, code: &str) -> Result<Link, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Statistics not found", json!({ "code": code })))
    }

    /// Counts active links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn total_links(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Builds the summary over all active links.
    ///
    /// `days` bounds the daily creation histogram (counted back from now).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn summary(&self, days: i64) -> Result<StatsSummary, AppError> {
        let total_links = self.repository.count().await?;
        let total_clicks = self.repository.total_clicks().await?;
        let links = self.repository.list_all().await?;

        let mut top_links = links.clone();
        top_links.sort_by(|a, b| b.click_count.cmp(&a.click_count));
        top_links.truncate(TOP_LINKS_LIMIT);

        let recent_links = links.iter().take(TOP_LINKS_LIMIT).cloned().collect();

        Ok(StatsSummary {
            total_links,
            total_clicks,
            average_clicks: click_rate(total_links, total_clicks),
            popular_domains: popular_domains(&links),
            daily_links: daily_link_counts(&links, days, Utc::now()),
            top_links,
            recent_links,
        })
    }
}

/// Average clicks per link; 0 when there are no links.
pub fn click_rate(total_links: i64, total_clicks: i64) -> f64 {
    if total_links > 0 {
        total_clicks as f64 / total_links as f64
    } else {
        0.0
    }
}

/// Counts links per host, most common first. Ties are ordered by host name.
pub fn popular_domains(links: &[Link]) -> Vec<DomainCount> {
    let mut counts: HashMap<String, i64> = HashMap::new();
    for link in links {
        if let Some(domain) = domain_of(&link.long_url) {
            *counts.entry(domain).or_default() += 1;
        }
    }

    let mut domains: Vec<DomainCount> = counts
        .into_iter()
        .map(|(domain, links)| DomainCount { domain, links })
        .collect();
    domains.sort_by(|a, b| b.links.cmp(&a.links).then_with(|| a.domain.cmp(&b.domain)));
    domains
}

/// Links created per UTC day within the last `days` days, oldest day first.
///
/// Days without links are omitted.
pub fn daily_link_counts(links: &[Link], days: i64, now: DateTime<Utc>) -> Vec<DailyCount> {
    let cutoff = now - Duration::days(days);

    let mut counts: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for link in links.iter().filter(|l| l.created_at >= cutoff) {
        *counts.entry(link.created_at.date_naive()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(date, links)| DailyCount { date, links })
        .collect()
}
