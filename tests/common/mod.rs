#![allow(dead_code)]

use std::sync::Arc;
use tokio::sync::mpsc;

use shortcode::domain::click_event::ClickEvent;
use shortcode::domain::entities::{Link, NewLink};
use shortcode::domain::repositories::LinkRepository;
use shortcode::infrastructure::persistence::InMemoryLinkRepository;
use shortcode::state::AppState;
use shortcode::utils::code_generator::CodeGenerator;

pub const BASE_URL: &str = "https://sho.rt";

pub struct TestContext {
    pub state: AppState,
    pub clicks: mpsc::Receiver<ClickEvent>,
    pub repo: Arc<InMemoryLinkRepository>,
}

pub fn create_test_state() -> TestContext {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let (tx, rx) = mpsc::channel(100);

    let state = AppState::new(repo.clone(), CodeGenerator::default(), tx)
        .with_base_url(Some(BASE_URL.to_string()));

    TestContext {
        state,
        clicks: rx,
        repo,
    }
}

pub async fn create_test_link(repo: &InMemoryLinkRepository, code: &str, url: &str) -> Link {
    repo.insert_if_absent(NewLink {
        code: code.to_string(),
        long_url: url.to_string(),
        description: None,
    })
    .await
    .unwrap()
    .unwrap()
}
