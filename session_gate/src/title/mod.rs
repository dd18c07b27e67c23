//! Display title shown on the index and redirect pages.
//!
//! The title is either configured directly or, when a lookup is configured,
//! fetched once at startup. A configured lookup that fails aborts startup
//! instead of silently falling back to the configured title.

mod errors;
mod youtube;

use async_trait::async_trait;

use crate::config::GateConfig;

pub use errors::TitleError;
pub use youtube::YoutubeTitleLookup;

#[async_trait]
pub trait TitleLookup: Send + Sync {
    async fn display_title(&self) -> Result<String, TitleError>;
}

/// Resolves the display title from `config`, running the lookup if one is configured.
pub async fn resolve_display_title(config: &GateConfig) -> Result<String, TitleError> {
    match &config.title_lookup {
        Some(lookup) => {
            let lookup = YoutubeTitleLookup::new(&lookup.api_key, &lookup.video_id)?;
            resolve_display_title_with(&config.title, Some(&lookup)).await
        }
        None => resolve_display_title_with(&config.title, None).await,
    }
}

pub async fn resolve_display_title_with(
    default_title: &str,
    lookup: Option<&dyn TitleLookup>,
) -> Result<String, TitleError> {
    let Some(lookup) = lookup else {
        return Ok(default_title.to_string());
    };
    let title = lookup.display_title().await.inspect_err(|e| {
        tracing::error!("Can not get display title: {}", e);
    })?;
    tracing::info!("Using looked up display title: {}", title);
    Ok(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTitle(Result<String, TitleError>);

    #[async_trait]
    impl TitleLookup for FixedTitle {
        async fn display_title(&self) -> Result<String, TitleError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_configured_title_without_lookup() {
        let config = GateConfig::new("secret", "https://login.example.com/");
        assert_eq!(resolve_display_title(&config).await.unwrap(), "AARS");
    }

    #[tokio::test]
    async fn test_lookup_overrides_configured_title() {
        let lookup = FixedTitle(Ok("Live stream".to_string()));
        let title = resolve_display_title_with("AARS", Some(&lookup)).await.unwrap();
        assert_eq!(title, "Live stream");
    }

    #[tokio::test]
    async fn test_failed_lookup_is_fatal() {
        // A broken lookup must not fall back to the configured title
        let lookup = FixedTitle(Err(TitleError::NoVideo("gone".to_string())));
        let result = resolve_display_title_with("AARS", Some(&lookup)).await;
        assert!(matches!(result, Err(TitleError::NoVideo(_))));
    }
}
