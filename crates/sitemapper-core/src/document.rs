//! In-memory accumulator for the sitemap file currently being built.

use crate::entry::UrlEntry;
use std::collections::BTreeSet;

/// XML namespaces a `urlset` may declare.
///
/// Ordering follows declaration order on the root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    /// Core sitemaps.org namespace, always declared as the default `xmlns`.
    Sitemap,
    /// Google image extension.
    Image,
    /// Google video extension.
    Video,
    /// Google news extension.
    News,
}

impl Namespace {
    /// Namespace URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Sitemap => "http://www.sitemaps.org/schemas/sitemap/0.9",
            Self::Image => "http://www.google.com/schemas/sitemap-image/1.1",
            Self::Video => "http://www.google.com/schemas/sitemap-video/1.1",
            Self::News => "http://www.google.com/schemas/sitemap-news/0.9",
        }
    }

    /// Element prefix, `None` for the default namespace.
    #[must_use]
    pub const fn prefix(self) -> Option<&'static str> {
        match self {
            Self::Sitemap => None,
            Self::Image => Some("image"),
            Self::Video => Some("video"),
            Self::News => Some("news"),
        }
    }

    /// Attribute name used to declare the namespace (`xmlns` or `xmlns:<prefix>`).
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Sitemap => "xmlns",
            Self::Image => "xmlns:image",
            Self::Video => "xmlns:video",
            Self::News => "xmlns:news",
        }
    }
}

/// Ordered URL entries of one output file plus the namespaces they need.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapDocument {
    entries: Vec<UrlEntry>,
    namespaces: BTreeSet<Namespace>,
}

impl Default for SitemapDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SitemapDocument {
    /// Empty document with only the sitemap namespace active.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            namespaces: BTreeSet::from([Namespace::Sitemap]),
        }
    }

    /// Append an already normalized entry, activating the namespaces it uses.
    ///
    /// Returns the entry's position within this document.
    pub fn push(&mut self, entry: UrlEntry) -> usize {
        if !entry.images.is_empty() {
            self.activate(Namespace::Image);
        }
        if entry.video.is_some() {
            self.activate(Namespace::Video);
        }
        if entry.news.is_some() {
            self.activate(Namespace::News);
        }
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[UrlEntry] {
        &self.entries
    }

    /// Mutable access to the entry at `position`.
    pub fn entry_mut(&mut self, position: usize) -> Option<&mut UrlEntry> {
        self.entries.get_mut(position)
    }

    /// Mark a namespace as used.
    pub fn activate(&mut self, namespace: Namespace) {
        self.namespaces.insert(namespace);
    }

    /// Active namespaces in declaration order.
    pub fn namespaces(&self) -> impl Iterator<Item = Namespace> + '_ {
        self.namespaces.iter().copied()
    }

    /// Whether `namespace` is active.
    #[must_use]
    pub fn is_active(&self, namespace: Namespace) -> bool {
        self.namespaces.contains(&namespace)
    }

    /// Drop all entries and extension namespaces.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.namespaces.clear();
        self.namespaces.insert(Namespace::Sitemap);
    }
}
