//! Shared state injected into every handler.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{LinkService, StatsService};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::utils::code_generator::CodeGenerator;

/// Application state.
///
/// Services hold the repository behind `dyn LinkRepository` so the store
/// (PostgreSQL or in-memory) is chosen at startup.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub stats_service: Arc<StatsService<dyn LinkRepository>>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Overrides the `Host`-derived base of short URLs.
    pub base_url: Option<String>,
    /// Strictness of URL checks in `/api/validate`.
    pub strict_url_validation: bool,
}

impl AppState {
    /// Wires both services to the same repository.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        generator: CodeGenerator,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(repository.clone(), generator)),
            stats_service: Arc::new(StatsService::new(repository)),
            click_sender,
            base_url: None,
            strict_url_validation: true,
        }
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_strict_url_validation(mut self, strict: bool) -> Self {
        self.strict_url_validation = strict;
        self
    }
}
