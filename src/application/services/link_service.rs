//! Link creation and retrieval service.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::domain::shortening::{Provenance, ShortenError, create_short_url};
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::code_validator::CodeError;
use crate::utils::url_normalizer::normalize_url;
use crate::utils::url_validator::validate_url;
use serde_json::json;

/// How many times creation is repeated after losing an insert race.
const MAX_CREATE_ROUNDS: usize = 3;

/// Service for creating and retrieving shortened links.
///
/// Handles validation, code selection and deduplication so that shortening
/// the same URL twice yields the same link.
pub struct LinkService<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    generator: CodeGenerator,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(repository: Arc<L>, generator: CodeGenerator) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// The generator used for system-assigned codes.
    pub fn generator(&self) -> &CodeGenerator {
        &self.generator
    }

    /// Creates a short link.
    ///
    /// # Deduplication
    ///
    /// Without a custom code, an active link for the same normalized URL is
    /// returned instead of creating a new one.
    ///
    /// # Races
    ///
    /// Codes are picked against a snapshot of the store and inserted with
    /// [`LinkRepository::insert_if_absent`]. A generated code that was taken in
    /// the meantime triggers a new round with a fresh snapshot, up to
    /// `MAX_CREATE_ROUNDS`. A custom code that was taken is a conflict.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for URL or custom code rule violations
    /// - [`AppError::Conflict`] if the custom code is already in use
    /// - [`AppError::Unavailable`] if no free code could be found
    /// - [`AppError::Internal`] on storage errors
    pub async fn shorten(
        &self,
        long_url: &str,
        custom_code: Option<&str>,
        description: Option<String>,
    ) -> Result<Link, AppError> {
        let custom_code = custom_code.filter(|c| !c.is_empty());

        if custom_code.is_none()
            && let Some(existing) = self.find_existing(long_url).await?
        {
            tracing::debug!("Reusing {} for {}", existing.code, existing.long_url);
            return Ok(existing);
        }

        for round in 1..=MAX_CREATE_ROUNDS {
            let existing_codes = self.repository.existing_codes().await?;
            let shortened =
                create_short_url(&self.generator, long_url, custom_code, &existing_codes)?;

            let new_link = NewLink {
                code: shortened.code.clone(),
                long_url: shortened.normalized_url.clone(),
                description: description.clone(),
            };

            if let Some(link) = self.repository.insert_if_absent(new_link).await? {
                tracing::info!(
                    "Created {} -> {} ({:?})",
                    link.code,
                    link.long_url,
                    shortened.provenance
                );
                return Ok(link);
            }

            if shortened.provenance == Provenance::Custom {
                return Err(ShortenError::from(CodeError::AlreadyInUse(shortened.code)).into());
            }

            if let Some(existing) = self
                .repository
                .find_by_long_url(&shortened.normalized_url)
                .await?
            {
                return Ok(existing);
            }

            tracing::warn!(
                "Code {} was taken concurrently (round {}/{})",
                shortened.code,
                round,
                MAX_CREATE_ROUNDS
            );
        }

        Err(AppError::unavailable(
            "Could not store a unique code, please try again",
            json!({ "rounds": MAX_CREATE_ROUNDS }),
        ))
    }

    /// Retrieves an active link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active link has the code.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Whether no link, active or not, holds `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn is_code_available(&self, code: &str) -> Result<bool, AppError> {
        Ok(!self.repository.code_exists(code).await?)
    }

    /// Constructs the full short URL from a base URL and code.
    pub fn short_url(&self, base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }

    /// Looks up a stored link for the URL, validating it first so that
    /// invalid input never short-circuits through the store.
    async fn find_existing(&self, long_url: &str) -> Result<Option<Link>, AppError> {
        validate_url(long_url, true).map_err(ShortenError::from)?;
        let normalized = normalize_url(long_url);
        self.repository.find_by_long_url(normalized.as_str()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;
    use mockall::Sequence;
    use std::collections::HashSet;

    fn create_test_link(id: i64, code: &str, url: &str) -> Link {
        Link::new(id, code.to_string(), url.to_string(), None, Utc::now())
    }

    fn stored(new_link: NewLink) -> Link {
        Link::new(
            1,
            new_link.code,
            new_link.long_url,
            new_link.description,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_shorten_uses_hash_code() {
        let mut mock_repo = MockLinkRepository::new();
        let generator = CodeGenerator::default();
        let expected = generator.hash_code("https://example.com/path", None);

        mock_repo
            .expect_find_by_long_url()
            .withf(|url| url == "https://example.com/path")
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_existing_codes()
            .times(1)
            .returning(|| Ok(HashSet::new()));
        mock_repo
            .expect_insert_if_absent()
            .withf(move |new_link| new_link.code == expected)
            .times(1)
            .returning(|new_link| Ok(Some(stored(new_link))));

        let service = LinkService::new(Arc::new(mock_repo), generator);

        let link = service
            .shorten("https://EXAMPLE.COM:443/path", None, None)
            .await
            .unwrap();

        assert_eq!(link.long_url, "https://example.com/path");
    }

    #[tokio::test]
    async fn test_shorten_deduplicates() {
        let mut mock_repo = MockLinkRepository::new();

        let existing_link = create_test_link(5, "existing", "https://example.com/");
        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(move |_| Ok(Some(existing_link.clone())));
        mock_repo.expect_existing_codes().times(0);
        mock_repo.expect_insert_if_absent().times(0);

        let service = LinkService::new(Arc::new(mock_repo), CodeGenerator::default());

        let link = service
            .shorten("https://example.com", None, None)
            .await
            .unwrap();

        assert_eq!(link.id, 5);
        assert_eq!(link.code, "existing");
    }

    #[tokio::test]
    async fn test_shorten_invalid_url() {
        let mock_repo = MockLinkRepository::new();
        let service = LinkService::new(Arc::new(mock_repo), CodeGenerator::default());

        let result = service.shorten("not-a-url", None, None).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_shorten_with_custom_code() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo.expect_find_by_long_url().times(0);
        mock_repo
            .expect_existing_codes()
            .times(1)
            .returning(|| Ok(HashSet::new()));
        mock_repo
            .expect_insert_if_absent()
            .withf(|new_link| {
                new_link.code == "my-link" && new_link.description.as_deref() == Some("Docs")
            })
            .times(1)
            .returning(|new_link| Ok(Some(stored(new_link))));

        let service = LinkService::new(Arc::new(mock_repo), CodeGenerator::default());

        let link = service
            .shorten(
                "https://example.com/docs",
                Some("my-link"),
                Some("Docs".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(link.code, "my-link");
    }

    #[tokio::test]
    async fn test_shorten_custom_code_conflict() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_existing_codes()
            .times(1)
            .returning(|| Ok(HashSet::from(["taken".to_string()])));
        mock_repo.expect_insert_if_absent().times(0);

        let service = LinkService::new(Arc::new(mock_repo), CodeGenerator::default());

        let result = service
            .shorten("https://example.com", Some("taken"), None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_shorten_custom_code_lost_race() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_existing_codes()
            .times(1)
            .returning(|| Ok(HashSet::new()));
        mock_repo
            .expect_insert_if_absent()
            .times(1)
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(mock_repo), CodeGenerator::default());

        let result = service
            .shorten("https://example.com", Some("promo"), None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_shorten_reserved_custom_code() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_existing_codes()
            .returning(|| Ok(HashSet::new()));
        mock_repo.expect_insert_if_absent().times(0);

        let service = LinkService::new(Arc::new(mock_repo), CodeGenerator::default());

        let result = service
            .shorten("https://example.com", Some("Admin"), None)
            .await;

        match result.unwrap_err() {
            AppError::Validation { details, .. } => assert_eq!(details["field"], "custom_code"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_shorten_retries_after_lost_race() {
        let mut mock_repo = MockLinkRepository::new();
        let mut seq = Sequence::new();

        mock_repo
            .expect_find_by_long_url()
            .times(2)
            .returning(|_| Ok(None));
        mock_repo
            .expect_existing_codes()
            .times(2)
            .returning(|| Ok(HashSet::new()));
        mock_repo
            .expect_insert_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        mock_repo
            .expect_insert_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| Ok(Some(stored(new_link))));

        let service = LinkService::new(Arc::new(mock_repo), CodeGenerator::default());

        let result = service.shorten("https://example.com/x", None, None).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_shorten_returns_concurrent_duplicate() {
        let mut mock_repo = MockLinkRepository::new();
        let mut seq = Sequence::new();

        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        mock_repo
            .expect_existing_codes()
            .times(1)
            .returning(|| Ok(HashSet::new()));
        mock_repo
            .expect_insert_if_absent()
            .times(1)
            .returning(|_| Ok(None));

        let winner = create_test_link(9, "winner", "https://example.com/x");
        mock_repo
            .expect_find_by_long_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(winner.clone())));

        let service = LinkService::new(Arc::new(mock_repo), CodeGenerator::default());

        let link = service
            .shorten("https://example.com/x", None, None)
            .await
            .unwrap();

        assert_eq!(link.code, "winner");
    }

    #[tokio::test]
    async fn test_shorten_gives_up_after_rounds() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_find_by_long_url()
            .returning(|_| Ok(None));
        mock_repo
            .expect_existing_codes()
            .times(MAX_CREATE_ROUNDS)
            .returning(|| Ok(HashSet::new()));
        mock_repo
            .expect_insert_if_absent()
            .times(MAX_CREATE_ROUNDS)
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(mock_repo), CodeGenerator::default());

        let result = service.shorten("https://example.com/x", None, None).await;

        assert!(matches!(result.unwrap_err(), AppError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_code()
            .withf(|code| code == "missing")
            .times(1)
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(mock_repo), CodeGenerator::default());

        let result = service.resolve("missing").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_is_code_available_checks_single_code() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_existing_codes().times(0);
        mock_repo
            .expect_code_exists()
            .withf(|code| code == "taken")
            .times(1)
            .returning(|_| Ok(true));
        mock_repo
            .expect_code_exists()
            .withf(|code| code == "free")
            .times(1)
            .returning(|_| Ok(false));

        let service = LinkService::new(Arc::new(mock_repo), CodeGenerator::default());

        assert!(!service.is_code_available("taken").await.unwrap());
        assert!(service.is_code_available("free").await.unwrap());
    }

    #[test]
    fn test_short_url() {
        let service = LinkService::new(
            Arc::new(MockLinkRepository::new()),
            CodeGenerator::default(),
        );

        assert_eq!(
            service.short_url("https://s.example.com/", "abc"),
            "https://s.example.com/abc"
        );
        assert_eq!(
            service.short_url("http://localhost:3000", "abc"),
            "http://localhost:3000/abc"
        );
    }
}
