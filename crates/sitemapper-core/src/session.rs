//! Incremental sitemap building with optional rollover.
//!
//! A [`SitemapSession`] owns the document being filled and the rollover state.
//! In single-file mode everything accumulates into `<base>.xml(.gz)`. With
//! auto-save enabled the session writes `<base>1.xml.gz`, `<base>2.xml.gz`, ...
//! as each file reaches the per-file capacity, and [`SitemapSession::finish`]
//! writes the last file plus an index at `<base>.xml.gz`.
//!
//! ```no_run
//! use sitemapper_core::{ChangeFrequency, SiteConfig, SitemapSession};
//!
//! let config = SiteConfig::builder()
//!     .site_address("https://example.com")
//!     .auto_save(true)
//!     .per_file(10_000)
//!     .build()?;
//!
//! let mut session = SitemapSession::new(config);
//! let page = session.add_url("/gallery", Some(ChangeFrequency::Weekly), None, Some(0.8))?;
//! session.add_image(page, "/images/cover.jpg")?;
//!
//! let summary = session.finish()?;
//! println!("wrote {} files", summary.files.len());
//! # Ok::<(), sitemapper_core::Error>(())
//! ```

use crate::config::SiteConfig;
use crate::document::{Namespace, SitemapDocument};
use crate::entry::{ChangeFrequency, ImageSource, LastModified, UrlEntry};
use crate::index::{build_index, render_index};
use crate::news::NewsEntry;
use crate::render::render_urlset;
use crate::storage::SitemapStorage;
use crate::video::VideoEntry;
use crate::{Error, Result, compression};
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// Rollover counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    /// Index of the file currently being filled, starting at 1.
    pub file_index: u32,
    /// Entries added over the whole session.
    pub entry_count: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            file_index: 1,
            entry_count: 0,
        }
    }
}

/// Reference to an entry in the open document, used to attach images.
///
/// A handle becomes stale once its document has been written out by a rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle {
    file_index: u32,
    position: usize,
}

impl EntryHandle {
    /// File the entry belongs to.
    #[must_use]
    pub const fn file_index(&self) -> u32 {
        self.file_index
    }

    /// Position of the entry within its file.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }
}

/// What a finished session produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Sitemap files in the order they were written.
    pub files: Vec<PathBuf>,
    /// Index file, written only in rollover mode.
    pub index: Option<PathBuf>,
    /// Number of URL entries added.
    pub total_entries: u64,
}

/// Builder of one sitemap (or one rotated set of sitemaps plus index).
#[derive(Debug)]
pub struct SitemapSession {
    config: SiteConfig,
    storage: SitemapStorage,
    document: SitemapDocument,
    state: SessionState,
    written: Vec<PathBuf>,
    dirty: bool,
    finished: bool,
}

impl SitemapSession {
    /// Start a session with an empty document.
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        if config.compression() && !compression::is_available() {
            warn!("Compression requested but gzip support is not built in; writes will fail");
        }
        let storage = SitemapStorage::new(config.output());
        Self {
            config,
            storage,
            document: SitemapDocument::new(),
            state: SessionState::default(),
            written: Vec::new(),
            dirty: false,
            finished: false,
        }
    }

    /// Configuration the session runs with.
    #[must_use]
    pub const fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Current rollover counters.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Document currently being filled.
    #[must_use]
    pub const fn document(&self) -> &SitemapDocument {
        &self.document
    }

    /// Files written so far.
    #[must_use]
    pub fn files_written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Add a page.
    ///
    /// `None` values are omitted from the output. The returned handle can be
    /// passed to [`Self::add_image`].
    ///
    /// # Errors
    ///
    /// - [`Error::Domain`] for an empty location or a priority outside `0.0..=1.0`.
    /// - [`Error::Config`] for a relative location without a site address.
    /// - [`Error::Io`] when a rollover write fails; the entry is not added.
    pub fn add_url(
        &mut self,
        loc: &str,
        changefreq: Option<ChangeFrequency>,
        lastmod: Option<LastModified>,
        priority: Option<f32>,
    ) -> Result<EntryHandle> {
        self.add_entry(UrlEntry {
            loc: loc.to_string(),
            lastmod,
            changefreq,
            priority,
            ..UrlEntry::default()
        })
    }

    /// Add a fully built entry, including any images, video or news it carries.
    pub fn add_entry(&mut self, entry: UrlEntry) -> Result<EntryHandle> {
        self.ensure_active()?;
        let entry = entry.normalized(&self.config)?;

        if let Some(video) = &entry.video {
            let missing = video.missing_required();
            if !missing.is_empty() {
                warn!(
                    "Video on {} is missing required fields: {}",
                    entry.loc,
                    missing.join(", ")
                );
            }
        }

        self.rollover_if_full()?;

        let position = self.document.push(entry);
        self.state.entry_count += 1;
        self.dirty = true;

        Ok(EntryHandle {
            file_index: self.state.file_index,
            position,
        })
    }

    /// Attach an image to a previously added entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] for an unknown image field, a missing `loc`, or a
    /// handle whose file has already been written. The entry is left unchanged.
    pub fn add_image(&mut self, handle: EntryHandle, image: impl Into<ImageSource>) -> Result<()> {
        self.ensure_active()?;
        let image = image.into().into_entry()?.normalized(&self.config)?;

        if handle.file_index != self.state.file_index {
            return Err(Error::Domain(format!(
                "Entry handle refers to file {} which has already been written",
                handle.file_index
            )));
        }
        let entry = self.document.entry_mut(handle.position).ok_or_else(|| {
            Error::Domain(format!("No entry at position {}", handle.position))
        })?;

        entry.images.push(image);
        self.document.activate(Namespace::Image);
        self.dirty = true;
        Ok(())
    }

    /// Add a page carrying one video built from key/value pairs.
    ///
    /// Incomplete video metadata is logged as a warning, not rejected.
    pub fn add_video<I, K, V>(&mut self, loc: &str, fields: I) -> Result<EntryHandle>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let video = VideoEntry::from_fields(fields)?;
        self.add_entry(UrlEntry::new(loc).with_video(video))
    }

    /// Add a page carrying one news article.
    pub fn add_news(&mut self, loc: &str, news: NewsEntry) -> Result<EntryHandle> {
        self.add_entry(UrlEntry::new(loc).with_news(news))
    }

    /// Render the open document without writing it.
    pub fn render(&self) -> Result<String> {
        let bytes = render_urlset(&self.document, self.config.legacy_video_prefix())?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Write the document to `<base>.xml` (or `.xml.gz`) in single-file mode.
    ///
    /// `compression` overrides the configured setting for this write. In rollover
    /// mode files are written automatically, so this does nothing and returns
    /// `Ok(None)`. On failure the document is kept for a retry.
    pub fn flush(&mut self, compression: Option<bool>) -> Result<Option<PathBuf>> {
        self.ensure_active()?;
        if self.config.auto_save() {
            debug!("Explicit flush ignored in rollover mode");
            return Ok(None);
        }

        let compressed = compression.unwrap_or_else(|| self.config.compression());
        let path = self.write_document(None, compressed)?;
        Ok(Some(path))
    }

    /// Write whatever is pending and, in rollover mode, the index.
    ///
    /// In single-file mode the document is written unless it was already flushed
    /// with no changes since. In rollover mode the open document is always written
    /// as the last numbered file. The session cannot be used afterwards.
    #[instrument(level = "debug", skip(self), fields(entries = self.state.entry_count))]
    pub fn finish(&mut self) -> Result<SessionSummary> {
        self.ensure_active()?;
        let compressed = self.config.compression();

        let index = if self.config.auto_save() {
            self.write_document(Some(self.state.file_index), compressed)?;

            let index = build_index(
                self.config.site_address(),
                &self.storage.base_name(),
                self.state.file_index,
                compressed,
                Utc::now(),
            );
            let path = self.storage.index_path(compressed);
            self.storage.write(&path, &render_index(&index)?, compressed)?;
            info!(
                "Wrote sitemap index {} ({} files)",
                path.display(),
                index.entries.len()
            );
            Some(path)
        } else {
            if self.dirty || self.written.is_empty() {
                self.write_document(None, compressed)?;
            }
            None
        };

        self.finished = true;
        Ok(SessionSummary {
            files: self.written.clone(),
            index,
            total_entries: self.state.entry_count,
        })
    }

    fn ensure_active(&self) -> Result<()> {
        if self.finished {
            return Err(Error::Domain("Session has already been finished".to_string()));
        }
        Ok(())
    }

    /// Write the full document out and start the next file once capacity is hit.
    fn rollover_if_full(&mut self) -> Result<()> {
        if !self.config.auto_save() {
            return Ok(());
        }

        let capacity = u64::try_from(self.config.per_file()).unwrap_or(u64::MAX);
        if self.state.entry_count > 0 && self.state.entry_count % capacity == 0 {
            debug!(
                "Rolling over after {} entries into file {}",
                self.state.entry_count,
                self.state.file_index + 1
            );
            self.write_document(Some(self.state.file_index), self.config.compression())?;
            self.document.reset();
            self.state.file_index += 1;
        }
        Ok(())
    }

    fn write_document(&mut self, index: Option<u32>, compressed: bool) -> Result<PathBuf> {
        let xml = render_urlset(&self.document, self.config.legacy_video_prefix())?;
        let path = self.storage.file_path(index, compressed);
        self.storage.write(&path, &xml, compressed)?;

        info!("Wrote {} ({} entries)", path.display(), self.document.len());
        if !self.written.contains(&path) {
            self.written.push(path.clone());
        }
        self.dirty = false;
        Ok(path)
    }
}

impl Drop for SitemapSession {
    fn drop(&mut self) {
        if !self.finished && self.dirty && !self.document.is_empty() {
            warn!(
                "Sitemap session dropped with {} unwritten entries; call finish() to write them",
                self.document.len()
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config(temp_dir: &TempDir) -> crate::config::SiteConfigBuilder {
        SiteConfig::builder()
            .site_address("http://www.example.com")
            .output(temp_dir.path().join("sitemap"))
            .compression(false)
    }

    #[cfg(not(feature = "gzip"))]
    #[test]
    fn test_compressed_session_without_gzip_fails_to_write() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut session = SitemapSession::new(config(&temp_dir).compression(true).build()?);
        session.add_url("/a", None, None, None)?;

        let err = session.finish().unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::Unsupported));
        assert!(!temp_dir.path().join("sitemap.xml.gz").exists());
        Ok(())
    }

    #[cfg(feature = "gzip")]
    #[test]
    fn test_compressed_session_writes_gzip() -> Result<()> {
        let temp_dir = TempDir::new()?;
        assert!(compression::is_available());
        let mut session = SitemapSession::new(config(&temp_dir).compression(true).build()?);
        session.add_url("/a", None, None, None)?;

        let summary = session.finish()?;
        let path = temp_dir.path().join("sitemap.xml.gz");
        assert_eq!(summary.files, vec![path.clone()]);
        let xml = compression::decompress_to_string(&fs::read(&path)?)?;
        assert!(xml.contains("<loc>http://www.example.com/a</loc>"));
        Ok(())
    }

    #[test]
    fn test_session_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<SitemapSession>();
    }

    #[test]
    fn test_add_url_normalizes_and_counts() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut session = SitemapSession::new(config(&temp_dir).build()?);

        let handle = session.add_url("/questions", Some(ChangeFrequency::Daily), None, Some(0.5))?;

        assert_eq!(handle.file_index(), 1);
        assert_eq!(handle.position(), 0);
        assert_eq!(session.state().entry_count, 1);
        assert_eq!(
            session.document().entries()[0].loc,
            "http://www.example.com/questions"
        );
        Ok(())
    }

    #[test]
    fn test_failed_add_leaves_document_unchanged() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut session = SitemapSession::new(config(&temp_dir).build()?);

        assert!(session.add_url("", None, None, None).is_err());
        assert!(session.add_url("/p", None, None, Some(2.0)).is_err());
        assert!(session.add_video("/v", [("title", "x"), ("bogus", "y")]).is_err());

        assert!(session.document().is_empty());
        assert_eq!(session.state().entry_count, 0);
        Ok(())
    }

    #[test]
    fn test_unknown_image_key_leaves_images_unchanged() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut session = SitemapSession::new(config(&temp_dir).build()?);
        let handle = session.add_url("/gallery", None, None, None)?;
        session.add_image(handle, "/images/a.gif")?;

        let err = session
            .add_image(
                handle,
                ImageSource::Fields(vec![
                    ("loc".to_string(), "/images/b.gif".to_string()),
                    ("bogus".to_string(), "x".to_string()),
                ]),
            )
            .unwrap_err();

        assert!(matches!(err, Error::Domain(_)));
        let images = &session.document().entries()[0].images;
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].loc, "http://www.example.com/images/a.gif");
        Ok(())
    }

    #[test]
    fn test_add_image_activates_namespace() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut session = SitemapSession::new(config(&temp_dir).build()?);
        let handle = session.add_url("/gallery", None, None, None)?;
        assert!(!session.document().is_active(Namespace::Image));

        session.add_image(handle, "/images/a.gif")?;

        assert!(session.document().is_active(Namespace::Image));
        assert!(session.render()?.contains("<image:loc>http://www.example.com/images/a.gif</image:loc>"));
        Ok(())
    }

    #[test]
    fn test_rollover_at_capacity() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut session =
            SitemapSession::new(config(&temp_dir).auto_save(true).per_file(3).build()?);

        for path in ["/a", "/b", "/c"] {
            session.add_url(path, None, None, None)?;
        }
        assert_eq!(session.document().len(), 3);
        assert!(session.files_written().is_empty());

        session.add_url("/d", None, None, None)?;

        let first = temp_dir.path().join("sitemap1.xml");
        assert_eq!(session.files_written(), &[first.clone()]);
        assert_eq!(fs::read_to_string(&first)?.matches("<url>").count(), 3);
        assert_eq!(session.document().len(), 1);
        assert_eq!(session.document().entries()[0].loc, "http://www.example.com/d");
        assert_eq!(session.state(), SessionState { file_index: 2, entry_count: 4 });
        Ok(())
    }

    #[test]
    fn test_stale_handle_is_domain_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut session =
            SitemapSession::new(config(&temp_dir).auto_save(true).per_file(1).build()?);

        let first = session.add_url("/a", None, None, None)?;
        session.add_image(first, "/still-valid.png")?;
        session.add_url("/b", None, None, None)?;

        let err = session.add_image(first, "/late.png").unwrap_err();
        assert!(matches!(err, Error::Domain(msg) if msg.contains("already been written")));
        Ok(())
    }

    #[test]
    fn test_video_and_news_count_toward_rollover() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut session =
            SitemapSession::new(config(&temp_dir).auto_save(true).per_file(2).build()?);

        session.add_video("/v", [("title", "Grilling"), ("thumbnail_loc", "/t.jpg")])?;
        session.add_news("/n", NewsEntry::new("Example", "en", "2024-01-15", "Hello"))?;
        session.add_url("/a", None, None, None)?;

        assert_eq!(session.files_written().len(), 1);
        let first = fs::read_to_string(temp_dir.path().join("sitemap1.xml"))?;
        assert!(first.contains("<video:thumbnail_loc>http://www.example.com/t.jpg</video:thumbnail_loc>"));
        assert!(first.contains("<news:name>Example</news:name>"));

        // The new document starts without extension namespaces.
        assert!(!session.render()?.contains("xmlns:video"));
        Ok(())
    }

    #[test]
    fn test_flush_single_file_with_override() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut session = SitemapSession::new(config(&temp_dir).build()?);
        session.add_url("/a", None, None, None)?;

        let path = session.flush(None)?.unwrap();
        assert_eq!(path, temp_dir.path().join("sitemap.xml"));
        assert!(fs::read_to_string(&path)?.contains("<loc>http://www.example.com/a</loc>"));

        #[cfg(feature = "gzip")]
        {
            let gz = session.flush(Some(true))?.unwrap();
            assert_eq!(gz, temp_dir.path().join("sitemap.xml.gz"));
            assert_eq!(&fs::read(&gz)?[..2], &[0x1f, 0x8b]);
        }

        // Document is kept; a later flush rewrites the whole file.
        assert_eq!(session.document().len(), 1);
        Ok(())
    }

    #[test]
    fn test_flush_is_noop_in_rollover_mode() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut session = SitemapSession::new(config(&temp_dir).auto_save(true).build()?);
        session.add_url("/a", None, None, None)?;

        assert_eq!(session.flush(None)?, None);
        assert!(fs::read_dir(temp_dir.path())?.next().is_none());
        Ok(())
    }

    #[test]
    fn test_finish_single_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut session = SitemapSession::new(config(&temp_dir).build()?);
        session.add_url("/a", None, None, None)?;

        let summary = session.finish()?;

        assert_eq!(summary.files, vec![temp_dir.path().join("sitemap.xml")]);
        assert_eq!(summary.index, None);
        assert_eq!(summary.total_entries, 1);
        Ok(())
    }

    #[test]
    fn test_finish_does_not_rewrite_clean_document() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut session = SitemapSession::new(config(&temp_dir).build()?);
        session.add_url("/a", None, None, None)?;
        session.flush(None)?;

        let path = temp_dir.path().join("sitemap.xml");
        fs::write(&path, "marker")?;
        session.finish()?;

        assert_eq!(fs::read_to_string(&path)?, "marker");
        Ok(())
    }

    #[test]
    fn test_use_after_finish_is_domain_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut session = SitemapSession::new(config(&temp_dir).build()?);
        session.finish()?;

        assert!(matches!(
            session.add_url("/a", None, None, None),
            Err(Error::Domain(_))
        ));
        assert!(matches!(session.finish(), Err(Error::Domain(_))));
        Ok(())
    }

    #[test]
    fn test_failed_rollover_keeps_document() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "file, not directory")?;

        let config = SiteConfig::builder()
            .site_address("http://www.example.com")
            .output(blocker.join("sitemap"))
            .compression(false)
            .auto_save(true)
            .per_file(1)
            .build()?;
        let mut session = SitemapSession::new(config);
        session.add_url("/a", None, None, None)?;

        let err = session.add_url("/b", None, None, None).unwrap_err();

        assert_eq!(err.category(), "io");
        assert_eq!(session.document().len(), 1);
        assert_eq!(session.state(), SessionState { file_index: 1, entry_count: 1 });
        Ok(())
    }
}
