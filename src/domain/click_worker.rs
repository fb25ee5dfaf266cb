//! Background worker that applies queued clicks to the store.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Retries after the first failed write.
const MAX_RETRIES: usize = 3;

/// Consumes click events until every sender is dropped.
///
/// Each event increments the link's counter. Storage errors are retried with
/// exponential backoff (10ms, 100ms, 1s, jittered); a click that still fails
/// is logged and dropped.
pub async fn run_click_worker<R>(mut rx: mpsc::Receiver<ClickEvent>, repository: Arc<R>)
where
    R: LinkRepository + ?Sized,
{
    while let Some(event) = rx.recv().await {
        let strategy = ExponentialBackoff::from_millis(10)
            .map(jitter)
            .take(MAX_RETRIES);

        let result = Retry::spawn(strategy, || {
            let repository = repository.clone();
            let code = event.code.clone();
            async move { repository.record_click(&code).await }
        })
        .await;

        match result {
            Ok(true) => tracing::debug!("Recorded click for {}", event.code),
            Ok(false) => tracing::debug!("Click for unknown code {} ignored", event.code),
            Err(e) => tracing::error!(
                "Failed to record click for {} after {} retries: {}",
                event.code,
                MAX_RETRIES,
                e
            ),
        }
    }

    tracing::info!("Click worker stopped");
}
