//! Sitemap entry types and their validation.
//!
//! A [`UrlEntry`] describes one `<url>` element. Callers build entries with raw
//! locations; [`UrlEntry::normalized`] validates every field and resolves all
//! locations (page, images, video URLs) against a [`SiteConfig`] before the entry
//! is handed to a document.

use crate::config::SiteConfig;
use crate::news::NewsEntry;
use crate::video::VideoEntry;
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Change frequency hints for a sitemap URL.
///
/// These values indicate how frequently a page is likely to change,
/// though search engines may not follow these hints strictly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    /// The page changes every time it is accessed.
    Always,
    /// The page changes hourly.
    Hourly,
    /// The page changes daily.
    Daily,
    /// The page changes weekly.
    Weekly,
    /// The page changes monthly.
    Monthly,
    /// The page changes yearly.
    Yearly,
    /// The page is archived and will not change.
    Never,
}

impl ChangeFrequency {
    /// The protocol spelling used inside `<changefreq>`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChangeFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            _ => Err(Error::Domain(format!("Invalid changefreq value: {s}"))),
        }
    }
}

/// Last modification time of a page.
///
/// Either ISO-8601 text supplied by the caller (stored as given, without format
/// validation) or a Unix timestamp that is rendered as ISO-8601 in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LastModified {
    /// Seconds since the Unix epoch.
    Timestamp(i64),
    /// Pre-formatted ISO-8601 date or date-time.
    Text(String),
}

impl LastModified {
    /// Render the value as the text written inside `<lastmod>`.
    ///
    /// Returns `Ok(None)` for empty text, which means "not supplied".
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] when a timestamp is outside the representable range.
    pub fn to_iso8601(&self) -> Result<Option<String>> {
        match self {
            Self::Text(text) if text.is_empty() => Ok(None),
            Self::Text(text) => Ok(Some(text.clone())),
            Self::Timestamp(secs) => Utc
                .timestamp_opt(*secs, 0)
                .single()
                .map(|dt| Some(format_iso8601(&dt)))
                .ok_or_else(|| Error::Domain(format!("Timestamp out of range: {secs}"))),
        }
    }
}

impl From<i64> for LastModified {
    fn from(secs: i64) -> Self {
        Self::Timestamp(secs)
    }
}

impl From<&str> for LastModified {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for LastModified {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for LastModified {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::Text(format_iso8601(&dt.with_timezone(&Utc)))
    }
}

/// Format a timestamp the way `<lastmod>` values are written: seconds precision
/// with an explicit `+00:00` offset.
pub(crate) fn format_iso8601(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Format a priority for `<priority>`, keeping at least one decimal place.
pub(crate) fn format_priority(priority: f32) -> String {
    if priority.fract() == 0.0 {
        format!("{priority:.1}")
    } else {
        priority.to_string()
    }
}

/// Recognized `image:image` child fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageField {
    /// `image:loc`
    Loc,
    /// `image:caption`
    Caption,
    /// `image:geo_location`
    GeoLocation,
    /// `image:title`
    Title,
    /// `image:license`
    License,
}

impl ImageField {
    /// Every recognized field in rendering order.
    pub const ALL: [Self; 5] = [
        Self::Loc,
        Self::Caption,
        Self::GeoLocation,
        Self::Title,
        Self::License,
    ];

    /// Local element name (without the `image:` prefix).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loc => "loc",
            Self::Caption => "caption",
            Self::GeoLocation => "geo_location",
            Self::Title => "title",
            Self::License => "license",
        }
    }
}

impl std::str::FromStr for ImageField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::Domain(format!("Invalid image field: {s}")))
    }
}

/// One `image:image` block attached to a URL.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Image URL (required).
    pub loc: String,
    /// Caption text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Geographic location, e.g. "Limerick, Ireland".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_location: Option<String>,
    /// Image title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// URL of the image license.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl ImageEntry {
    /// Create an image with only a location.
    #[must_use]
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            ..Self::default()
        }
    }

    /// Set the caption.
    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Set the geographic location.
    #[must_use]
    pub fn with_geo_location(mut self, geo_location: impl Into<String>) -> Self {
        self.geo_location = Some(geo_location.into());
        self
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the license URL.
    #[must_use]
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    /// Build an image from key/value pairs.
    ///
    /// Keys are restricted to `loc`, `caption`, `geo_location`, `title` and
    /// `license`; a repeated key keeps its last value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] for an unknown key or when `loc` is missing.
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut loc = None;
        let mut image = Self::default();

        for (key, value) in fields {
            let value = value.into();
            match key.as_ref().parse::<ImageField>()? {
                ImageField::Loc => loc = Some(value),
                ImageField::Caption => image.caption = Some(value),
                ImageField::GeoLocation => image.geo_location = Some(value),
                ImageField::Title => image.title = Some(value),
                ImageField::License => image.license = Some(value),
            }
        }

        image.loc = loc.ok_or_else(|| Error::Domain("Image is missing 'loc'".to_string()))?;
        Ok(image)
    }

    /// Present fields in rendering order, paired with their value.
    pub(crate) fn fields(&self) -> impl Iterator<Item = (ImageField, &str)> {
        [
            (ImageField::Loc, Some(self.loc.as_str())),
            (ImageField::Caption, self.caption.as_deref()),
            (ImageField::GeoLocation, self.geo_location.as_deref()),
            (ImageField::Title, self.title.as_deref()),
            (ImageField::License, self.license.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
    }

    /// Resolve the image location against the site configuration.
    ///
    /// Only `loc` is normalized; every other field is literal text.
    pub fn normalized(mut self, config: &SiteConfig) -> Result<Self> {
        self.loc = config.normalize(&self.loc)?;
        Ok(self)
    }
}

/// Image data accepted by [`crate::SitemapSession::add_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A bare image URL, used as `image:loc` only.
    Url(String),
    /// Key/value pairs validated by [`ImageEntry::from_fields`].
    Fields(Vec<(String, String)>),
    /// An already structured image.
    Entry(ImageEntry),
}

impl ImageSource {
    /// Convert the source into a (not yet normalized) [`ImageEntry`].
    pub fn into_entry(self) -> Result<ImageEntry> {
        match self {
            Self::Url(loc) => Ok(ImageEntry::new(loc)),
            Self::Fields(fields) => ImageEntry::from_fields(fields),
            Self::Entry(entry) => Ok(entry),
        }
    }
}

impl From<&str> for ImageSource {
    fn from(loc: &str) -> Self {
        Self::Url(loc.to_string())
    }
}

impl From<String> for ImageSource {
    fn from(loc: String) -> Self {
        Self::Url(loc)
    }
}

impl From<ImageEntry> for ImageSource {
    fn from(entry: ImageEntry) -> Self {
        Self::Entry(entry)
    }
}

/// One `<url>` element of a sitemap.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UrlEntry {
    /// Page location; absolute once normalized.
    pub loc: String,
    /// Last modification time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<LastModified>,
    /// Change frequency hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<ChangeFrequency>,
    /// Crawl priority in `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f32>,
    /// Images on the page, in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageEntry>,
    /// Video hosted on the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoEntry>,
    /// News article metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news: Option<NewsEntry>,
}

impl UrlEntry {
    /// Create an entry with only a location.
    #[must_use]
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            ..Self::default()
        }
    }

    /// Set the last modification time.
    #[must_use]
    pub fn with_lastmod(mut self, lastmod: impl Into<LastModified>) -> Self {
        self.lastmod = Some(lastmod.into());
        self
    }

    /// Set the change frequency.
    #[must_use]
    pub const fn with_changefreq(mut self, changefreq: ChangeFrequency) -> Self {
        self.changefreq = Some(changefreq);
        self
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Append an image.
    #[must_use]
    pub fn with_image(mut self, image: ImageEntry) -> Self {
        self.images.push(image);
        self
    }

    /// Attach a video.
    #[must_use]
    pub fn with_video(mut self, video: VideoEntry) -> Self {
        self.video = Some(video);
        self
    }

    /// Attach news metadata.
    #[must_use]
    pub fn with_news(mut self, news: NewsEntry) -> Self {
        self.news = Some(news);
        self
    }

    /// Validate the entry and resolve every location it carries.
    ///
    /// Timestamps become ISO-8601 text and empty `lastmod` text is dropped. The
    /// entry is consumed and returned whole, so a failure never leaves a partial
    /// entry behind.
    ///
    /// # Errors
    ///
    /// - [`Error::Domain`] for an empty location, an out-of-range priority or
    ///   timestamp.
    /// - [`Error::Config`] for a relative location without a site address.
    pub fn normalized(self, config: &SiteConfig) -> Result<Self> {
        if let Some(priority) = self.priority {
            if !(0.0..=1.0).contains(&priority) {
                return Err(Error::Domain(format!(
                    "Priority must be between 0.0 and 1.0, got {priority}"
                )));
            }
        }

        let lastmod = match &self.lastmod {
            Some(lastmod) => lastmod.to_iso8601()?.map(LastModified::Text),
            None => None,
        };

        Ok(Self {
            loc: config.normalize(&self.loc)?,
            lastmod,
            changefreq: self.changefreq,
            // -0.0 passes the range check but must render as 0.0
            priority: self.priority.map(|p| if p == 0.0 { 0.0 } else { p }),
            images: self
                .images
                .into_iter()
                .map(|image| image.normalized(config))
                .collect::<Result<_>>()?,
            video: self.video.map(|video| video.normalized(config)).transpose()?,
            news: self.news,
        })
    }

    /// The `<lastmod>` text of a normalized entry.
    pub(crate) fn lastmod_text(&self) -> Option<&str> {
        match &self.lastmod {
            Some(LastModified::Text(text)) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}
