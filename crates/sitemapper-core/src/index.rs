//! Sitemap index (`sitemapindex`) listing every rotated file.

use crate::document::Namespace;
use crate::entry::format_iso8601;
use crate::render::XmlWriter;
use crate::storage::SitemapStorage;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One `<sitemap>` child of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapIndexEntry {
    /// Location of the rotated file.
    pub loc: String,
    /// Generation time, ISO-8601.
    pub lastmod: String,
}

/// Index document contents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SitemapIndex {
    /// Entries in file order.
    pub entries: Vec<SitemapIndexEntry>,
}

/// Build the index for files `1..=file_count`.
///
/// Each location is `<site>/<base_name><n><ext>`; without a site address the bare
/// file name is used. Every entry carries the same `generated_at` timestamp.
#[must_use]
pub fn build_index(
    site: Option<&str>,
    base_name: &str,
    file_count: u32,
    compressed: bool,
    generated_at: DateTime<Utc>,
) -> SitemapIndex {
    let lastmod = format_iso8601(&generated_at);
    let extension = SitemapStorage::extension(compressed);

    let entries = (1..=file_count)
        .map(|n| {
            let file_name = format!("{base_name}{n}{extension}");
            let loc = match site {
                Some(site) => format!("{site}/{file_name}"),
                None => file_name,
            };
            SitemapIndexEntry {
                loc,
                lastmod: lastmod.clone(),
            }
        })
        .collect();

    SitemapIndex { entries }
}

/// Render the index document.
pub fn render_index(index: &SitemapIndex) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.open(
        "sitemapindex",
        &[(Namespace::Sitemap.attribute(), Namespace::Sitemap.uri())],
    )?;
    for entry in &index.entries {
        xml.open("sitemap", &[])?;
        xml.text_element("loc", &entry.loc)?;
        xml.text_element("lastmod", &entry.lastmod)?;
        xml.close("sitemap")?;
    }
    xml.close("sitemapindex")?;
    Ok(xml.into_bytes())
}
