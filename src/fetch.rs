//! The binary-fetch collaborator seam.
//!
//! The compositor never talks to the network itself; it asks an
//! [`AssetFetcher`] for the raw encoded bytes behind each layer's image URL.
//! Implementations typically wrap an HTTP client; tests use an in-memory
//! map. Retry policy belongs to the implementation, not the render pipeline.

use async_trait::async_trait;

/// Failure reported by an [`AssetFetcher`] for a single locator.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Retrieves raw encoded image bytes for a layer's image locator.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, image_url: &str) -> Result<Vec<u8>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_display_and_source() {
        let inner = std::io::Error::other("socket closed");
        let err = FetchError::with_source("GET failed", inner);
        assert_eq!(err.to_string(), "GET failed");
        assert!(
            std::error::Error::source(&err)
                .expect("source preserved")
                .to_string()
                .contains("socket closed")
        );
    }
}
