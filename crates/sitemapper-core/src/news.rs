//! Google News sitemap extension (`news:news`).

use serde::{Deserialize, Serialize};

/// Metadata for one news article.
///
/// Publication name, language, publication date and title are required by the
/// news schema; the remaining fields are optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewsEntry {
    /// Name of the news publication, e.g. "The Example Times".
    pub publication_name: String,
    /// ISO 639 language code of the publication.
    pub publication_language: String,
    /// Article publication date (ISO-8601).
    pub publication_date: String,
    /// Article title.
    pub title: String,
    /// `Subscription` or `Registration`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    /// Comma-separated genres, e.g. "PressRelease, Blog".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
    /// Comma-separated keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// Comma-separated stock tickers, e.g. "NASDAQ:A, NASDAQ:B".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_tickers: Option<String>,
}

impl NewsEntry {
    /// Create a news block with the required fields.
    #[must_use]
    pub fn new(
        publication_name: impl Into<String>,
        publication_language: impl Into<String>,
        publication_date: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            publication_name: publication_name.into(),
            publication_language: publication_language.into(),
            publication_date: publication_date.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the access restriction.
    #[must_use]
    pub fn with_access(mut self, access: impl Into<String>) -> Self {
        self.access = Some(access.into());
        self
    }

    /// Set the genres.
    #[must_use]
    pub fn with_genres(mut self, genres: impl Into<String>) -> Self {
        self.genres = Some(genres.into());
        self
    }

    /// Set the keywords.
    #[must_use]
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// Set the stock tickers.
    #[must_use]
    pub fn with_stock_tickers(mut self, stock_tickers: impl Into<String>) -> Self {
        self.stock_tickers = Some(stock_tickers.into());
        self
    }
}
