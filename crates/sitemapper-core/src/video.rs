//! Google video sitemap extension (`video:video`).
//!
//! A [`VideoEntry`] is an ordered list of recognized fields. Order is kept as
//! supplied and keys may repeat (several `tag` values are common). Every field
//! whose name contains `loc` is a URL and gets normalized like a page location.

use crate::config::SiteConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Recognized `video:video` child fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoField {
    /// Thumbnail image URL.
    ThumbnailLoc,
    /// Video title.
    Title,
    /// Video description.
    Description,
    /// URL of the raw media file.
    ContentLoc,
    /// URL of an embeddable player.
    PlayerLoc,
    /// Duration in seconds.
    Duration,
    /// Date after which the video is unavailable.
    ExpirationDate,
    /// Rating from 0.0 to 5.0.
    Rating,
    /// Number of views.
    ViewCount,
    /// Original publication date.
    PublicationDate,
    /// `yes` or `no`.
    FamilyFriendly,
    /// Free-form tag; may repeat.
    Tag,
    /// Short category description.
    Category,
    /// Country restriction list.
    Restriction,
    /// URL of the gallery the video belongs to.
    GalleryLoc,
    /// Price to download or view.
    Price,
    /// `yes` or `no`.
    RequiresSubscription,
    /// Uploader name.
    Uploader,
    /// Platform restriction list.
    Platform,
    /// `yes` or `no`.
    Live,
}

impl VideoField {
    /// Every recognized field.
    pub const ALL: [Self; 20] = [
        Self::ThumbnailLoc,
        Self::Title,
        Self::Description,
        Self::ContentLoc,
        Self::PlayerLoc,
        Self::Duration,
        Self::ExpirationDate,
        Self::Rating,
        Self::ViewCount,
        Self::PublicationDate,
        Self::FamilyFriendly,
        Self::Tag,
        Self::Category,
        Self::Restriction,
        Self::GalleryLoc,
        Self::Price,
        Self::RequiresSubscription,
        Self::Uploader,
        Self::Platform,
        Self::Live,
    ];

    /// Local element name (without namespace prefix).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThumbnailLoc => "thumbnail_loc",
            Self::Title => "title",
            Self::Description => "description",
            Self::ContentLoc => "content_loc",
            Self::PlayerLoc => "player_loc",
            Self::Duration => "duration",
            Self::ExpirationDate => "expiration_date",
            Self::Rating => "rating",
            Self::ViewCount => "view_count",
            Self::PublicationDate => "publication_date",
            Self::FamilyFriendly => "family_friendly",
            Self::Tag => "tag",
            Self::Category => "category",
            Self::Restriction => "restriction",
            Self::GalleryLoc => "gallery_loc",
            Self::Price => "price",
            Self::RequiresSubscription => "requires_subscription",
            Self::Uploader => "uploader",
            Self::Platform => "platform",
            Self::Live => "live",
        }
    }

    /// Whether the field carries a URL.
    #[must_use]
    pub fn is_location(self) -> bool {
        self.as_str().contains("loc")
    }
}

impl std::str::FromStr for VideoField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::Domain(format!("Invalid video field: {s}")))
    }
}

/// One `video:video` block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoEntry {
    fields: Vec<(VideoField, String)>,
}

impl VideoEntry {
    /// Create an empty video block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field value.
    #[must_use]
    pub fn with(mut self, field: VideoField, value: impl Into<String>) -> Self {
        self.fields.push((field, value.into()));
        self
    }

    /// Build a video block from key/value pairs, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] for a key outside the 20 recognized fields.
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(key, value)| Ok((key.as_ref().parse::<VideoField>()?, value.into())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { fields })
    }

    /// Fields in supplied order.
    pub fn fields(&self) -> impl Iterator<Item = (VideoField, &str)> {
        self.fields.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// First value supplied for `field`.
    #[must_use]
    pub fn get(&self, field: VideoField) -> Option<&str> {
        self.fields()
            .find_map(|(f, value)| (f == field).then_some(value))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of the fields search engines require that are absent.
    ///
    /// Required: `thumbnail_loc`, `title`, `description` and one of
    /// `content_loc` / `player_loc`.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing: Vec<&'static str> =
            [VideoField::ThumbnailLoc, VideoField::Title, VideoField::Description]
                .into_iter()
                .filter(|field| self.get(*field).is_none())
                .map(VideoField::as_str)
                .collect();
        if self.get(VideoField::ContentLoc).is_none() && self.get(VideoField::PlayerLoc).is_none() {
            missing.push("content_loc|player_loc");
        }
        missing
    }

    /// Normalize every URL-valued field.
    pub fn normalized(self, config: &SiteConfig) -> Result<Self> {
        let fields = self
            .fields
            .into_iter()
            .map(|(field, value)| {
                if field.is_location() {
                    Ok((field, config.normalize(&value)?))
                } else {
                    Ok((field, value))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { fields })
    }
}
