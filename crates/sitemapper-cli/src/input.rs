//! Line-oriented input for `generate`.
//!
//! Each non-blank line that does not start with `#` is one URL entry:
//!
//! ```text
//! # bare locations
//! /about
//! https://example.com/contact
//!
//! # JSON objects for everything else
//! {"loc": "/gallery", "changefreq": "weekly", "images": ["/a.jpg", {"loc": "/b.jpg", "caption": "B"}]}
//! {"loc": "/watch", "video": [["title", "Grilling"], ["tag", "steak"], ["tag", "summer"]]}
//! ```
//!
//! `video` is either an object or a list of `[key, value]` pairs; only the list
//! form keeps repeated keys and their order.

use serde::Deserialize;
use sitemapper_core::{
    ChangeFrequency, ImageSource, LastModified, NewsEntry, Result, UrlEntry, VideoEntry,
};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonRecord {
    loc: String,
    #[serde(default)]
    lastmod: Option<LastModified>,
    #[serde(default)]
    changefreq: Option<ChangeFrequency>,
    #[serde(default)]
    priority: Option<f32>,
    #[serde(default)]
    images: Vec<JsonImage>,
    #[serde(default)]
    video: Option<JsonVideo>,
    #[serde(default)]
    news: Option<NewsEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonImage {
    Url(String),
    Fields(BTreeMap<String, String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonVideo {
    Pairs(Vec<(String, String)>),
    Object(BTreeMap<String, String>),
}

impl From<JsonImage> for ImageSource {
    fn from(image: JsonImage) -> Self {
        match image {
            JsonImage::Url(loc) => Self::Url(loc),
            JsonImage::Fields(fields) => Self::Fields(fields.into_iter().collect()),
        }
    }
}

impl JsonVideo {
    fn into_entry(self) -> Result<VideoEntry> {
        match self {
            Self::Pairs(pairs) => VideoEntry::from_fields(pairs),
            Self::Object(fields) => VideoEntry::from_fields(fields),
        }
    }
}

impl JsonRecord {
    fn into_entry(self) -> Result<UrlEntry> {
        let images = self
            .images
            .into_iter()
            .map(|image| ImageSource::from(image).into_entry())
            .collect::<Result<Vec<_>>>()?;
        let video = self.video.map(JsonVideo::into_entry).transpose()?;

        Ok(UrlEntry {
            loc: self.loc,
            lastmod: self.lastmod,
            changefreq: self.changefreq,
            priority: self.priority,
            images,
            video,
            news: self.news,
        })
    }
}

/// Parse one input line.
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<UrlEntry>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    if line.starts_with('{') {
        let record: JsonRecord = serde_json::from_str(line)?;
        return record.into_entry().map(Some);
    }

    Ok(Some(UrlEntry::new(line)))
}
