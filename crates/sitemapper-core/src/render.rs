//! XML rendering of sitemap documents.
//!
//! Output is UTF-8 with an `<?xml version="1.0" encoding="UTF-8"?>` declaration,
//! indented by two spaces. Text content is escaped by quick-xml, which is where a
//! query-string `&` becomes `&amp;`.

use crate::document::SitemapDocument;
use crate::entry::{UrlEntry, format_priority};
use crate::news::NewsEntry;
use crate::video::VideoEntry;
use crate::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

/// Thin wrapper over an indenting quick-xml writer into memory.
pub(crate) struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    /// Start a document with the XML declaration already written.
    pub(crate) fn new() -> Result<Self> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(Self { writer })
    }

    pub(crate) fn open(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for attribute in attributes {
            start.push_attribute(*attribute);
        }
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    pub(crate) fn close(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write `<name>text</name>` on one line.
    pub(crate) fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner().into_inner()
    }
}

/// Render a `urlset` document.
///
/// Video fields are written under the `video:` prefix, or under `image:` when
/// `legacy_video_prefix` is set.
pub fn render_urlset(document: &SitemapDocument, legacy_video_prefix: bool) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;

    let declarations: Vec<(&str, &str)> = document
        .namespaces()
        .map(|namespace| (namespace.attribute(), namespace.uri()))
        .collect();
    xml.open("urlset", &declarations)?;

    let video_prefix = if legacy_video_prefix { "image" } else { "video" };
    for entry in document.entries() {
        write_url(&mut xml, entry, video_prefix)?;
    }

    xml.close("urlset")?;
    Ok(xml.into_bytes())
}

fn write_url(xml: &mut XmlWriter, entry: &UrlEntry, video_prefix: &str) -> Result<()> {
    xml.open("url", &[])?;
    xml.text_element("loc", &entry.loc)?;
    if let Some(lastmod) = entry.lastmod_text() {
        xml.text_element("lastmod", lastmod)?;
    }
    if let Some(changefreq) = entry.changefreq {
        xml.text_element("changefreq", changefreq.as_str())?;
    }
    if let Some(priority) = entry.priority {
        xml.text_element("priority", &format_priority(priority))?;
    }

    for image in &entry.images {
        xml.open("image:image", &[])?;
        for (field, value) in image.fields() {
            xml.text_element(&format!("image:{}", field.as_str()), value)?;
        }
        xml.close("image:image")?;
    }

    if let Some(video) = &entry.video {
        write_video(xml, video, video_prefix)?;
    }

    if let Some(news) = &entry.news {
        write_news(xml, news)?;
    }

    xml.close("url")
}

fn write_video(xml: &mut XmlWriter, video: &VideoEntry, prefix: &str) -> Result<()> {
    xml.open("video:video", &[])?;
    for (field, value) in video.fields() {
        xml.text_element(&format!("{prefix}:{}", field.as_str()), value)?;
    }
    xml.close("video:video")
}

fn write_news(xml: &mut XmlWriter, news: &NewsEntry) -> Result<()> {
    xml.open("news:news", &[])?;

    xml.open("news:publication", &[])?;
    xml.text_element("news:name", &news.publication_name)?;
    xml.text_element("news:language", &news.publication_language)?;
    xml.close("news:publication")?;

    if let Some(access) = &news.access {
        xml.text_element("news:access", access)?;
    }
    if let Some(genres) = &news.genres {
        xml.text_element("news:genres", genres)?;
    }
    xml.text_element("news:publication_date", &news.publication_date)?;
    xml.text_element("news:title", &news.title)?;
    if let Some(keywords) = &news.keywords {
        xml.text_element("news:keywords", keywords)?;
    }
    if let Some(stock_tickers) = &news.stock_tickers {
        xml.text_element("news:stock_tickers", stock_tickers)?;
    }

    xml.close("news:news")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::entry::{ChangeFrequency, ImageEntry, LastModified};
    use crate::video::VideoField;
    use quick_xml::Reader;

    fn render(document: &SitemapDocument) -> String {
        String::from_utf8(render_urlset(document, false).unwrap()).unwrap()
    }

    fn read_locs(xml: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut locs = Vec::new();
        let mut in_loc = false;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().as_ref() == b"loc" => in_loc = true,
                Event::End(e) if e.name().as_ref() == b"loc" => in_loc = false,
                Event::Text(e) if in_loc => locs.push(e.unescape().unwrap().into_owned()),
                Event::Eof => break,
                _ => {},
            }
        }
        locs
    }

    #[test]
    fn test_empty_urlset() {
        let xml = render(&SitemapDocument::new());
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(!xml.contains("xmlns:image"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_locs_roundtrip_through_reader() {
        let mut doc = SitemapDocument::new();
        for path in ["a", "b?x=1&y=2", "c"] {
            doc.push(UrlEntry::new(format!("https://example.com/{path}")));
        }
        let xml = render(&doc);

        assert!(xml.contains("<loc>https://example.com/b?x=1&amp;y=2</loc>"));
        assert_eq!(
            read_locs(&xml),
            vec![
                "https://example.com/a",
                "https://example.com/b?x=1&y=2",
                "https://example.com/c"
            ]
        );
    }

    #[test]
    fn test_url_children_order_and_indent() {
        let mut doc = SitemapDocument::new();
        doc.push(UrlEntry {
            loc: "https://example.com/".to_string(),
            lastmod: Some(LastModified::Text("2024-01-15".to_string())),
            changefreq: Some(ChangeFrequency::Daily),
            priority: Some(1.0),
            ..UrlEntry::default()
        });
        let xml = render(&doc);

        assert!(xml.contains("\n  <url>\n    <loc>"));
        let loc = xml.find("<loc>").unwrap();
        let lastmod = xml.find("<lastmod>2024-01-15</lastmod>").unwrap();
        let changefreq = xml.find("<changefreq>daily</changefreq>").unwrap();
        let priority = xml.find("<priority>1.0</priority>").unwrap();
        assert!(loc < lastmod && lastmod < changefreq && changefreq < priority);
    }

    #[test]
    fn test_optional_children_omitted() {
        let mut doc = SitemapDocument::new();
        doc.push(UrlEntry::new("https://example.com/"));
        let xml = render(&doc);
        assert!(!xml.contains("<lastmod>"));
        assert!(!xml.contains("<changefreq>"));
        assert!(!xml.contains("<priority>"));
    }

    #[test]
    fn test_images_render_with_namespace() {
        let mut doc = SitemapDocument::new();
        doc.push(
            UrlEntry::new("https://example.com/p")
                .with_image(ImageEntry::new("https://example.com/a.gif").with_caption("A & B"))
                .with_image(ImageEntry::new("https://example.com/b.gif")),
        );
        let xml = render(&doc);

        assert!(xml.contains(r#"xmlns:image="http://www.google.com/schemas/sitemap-image/1.1""#));
        assert_eq!(xml.matches("<image:image>").count(), 2);
        assert!(xml.contains("<image:caption>A &amp; B</image:caption>"));
        assert!(xml.find("a.gif").unwrap() < xml.find("b.gif").unwrap());
    }

    #[test]
    fn test_video_uses_video_prefix() {
        let mut doc = SitemapDocument::new();
        doc.push(
            UrlEntry::new("https://example.com/v").with_video(
                VideoEntry::new()
                    .with(VideoField::Title, "Grilling")
                    .with(VideoField::Tag, "steak"),
            ),
        );
        let xml = render(&doc);

        assert!(xml.contains(r#"xmlns:video="http://www.google.com/schemas/sitemap-video/1.1""#));
        assert!(xml.contains("<video:title>Grilling</video:title>"));
        assert!(xml.contains("<video:tag>steak</video:tag>"));
    }

    #[test]
    fn test_legacy_video_prefix_uses_image_prefix() {
        let mut doc = SitemapDocument::new();
        doc.push(
            UrlEntry::new("https://example.com/v")
                .with_video(VideoEntry::new().with(VideoField::Title, "Grilling")),
        );
        let xml = String::from_utf8(render_urlset(&doc, true).unwrap()).unwrap();

        assert!(xml.contains("<video:video>"));
        assert!(xml.contains("<image:title>Grilling</image:title>"));
        assert!(!xml.contains("<video:title>"));
    }

    #[test]
    fn test_news_block_layout() {
        let mut doc = SitemapDocument::new();
        doc.push(
            UrlEntry::new("https://example.com/n").with_news(
                NewsEntry::new("The Example Times", "en", "2024-01-15", "Big News")
                    .with_genres("PressRelease")
                    .with_keywords("example, news"),
            ),
        );
        let xml = render(&doc);

        assert!(xml.contains(r#"xmlns:news="http://www.google.com/schemas/sitemap-news/0.9""#));
        let name = xml.find("<news:name>The Example Times</news:name>").unwrap();
        let genres = xml.find("<news:genres>PressRelease</news:genres>").unwrap();
        let date = xml.find("<news:publication_date>").unwrap();
        let title = xml.find("<news:title>Big News</news:title>").unwrap();
        let keywords = xml.find("<news:keywords>").unwrap();
        assert!(name < genres && genres < date && date < title && title < keywords);
        assert!(!xml.contains("<news:access>"));
    }
}
