//! # sitemapper-core
//!
//! Incremental builder for XML sitemaps following the sitemaps.org protocol and
//! Google's image, video and news extensions.
//!
//! Entries are added one at a time to a [`SitemapSession`]. Locations are
//! resolved against a site address and percent-encoded, optional fields are
//! validated, and the result accumulates in memory until it is written. With
//! rollover enabled the session splits output across numbered files of at most
//! `per_file` URLs each and finishes with a sitemap index listing them.
//!
//! ## Architecture
//!
//! - **Normalization**: location resolution and percent-encoding ([`normalize`])
//! - **Entries**: typed URL, image, video and news data ([`entry`], [`video`], [`news`])
//! - **Documents**: the open file and its namespaces ([`document`])
//! - **Output**: XML rendering, gzip and atomic file writes ([`render`],
//!   [`compression`], [`storage`], [`index`])
//! - **Sessions**: rollover state and the public workflow ([`session`])
//!
//! ## Quick Start
//!
//! ```rust
//! use sitemapper_core::{ChangeFrequency, SiteConfig, SitemapSession};
//!
//! let config = SiteConfig::builder()
//!     .site_address("https://example.com")
//!     .build()?;
//!
//! let mut session = SitemapSession::new(config);
//! session.add_url("/über uns", Some(ChangeFrequency::Monthly), None, Some(0.5))?;
//!
//! let xml = session.render()?;
//! assert!(xml.contains("<loc>https://example.com/%C3%BCber%20uns</loc>"));
//! # Ok::<(), sitemapper_core::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`]. A failed call leaves the session
//! exactly as it was, including failed writes during rollover.

/// Gzip encoding of output files
pub mod compression;
/// Site configuration and settings files
pub mod config;
/// In-memory document being filled
pub mod document;
/// URL entries and their images
pub mod entry;
/// Error types and result aliases
pub mod error;
/// Sitemap index documents
pub mod index;
/// Google News extension
pub mod news;
/// Location normalization
pub mod normalize;
/// XML rendering
pub mod render;
/// Sessions and rollover
pub mod session;
/// Output paths and atomic writes
pub mod storage;
/// Google video extension
pub mod video;

// Re-export commonly used types
pub use config::{SiteConfig, SiteConfigBuilder, SitemapSettings};
pub use document::{Namespace, SitemapDocument};
pub use entry::{ChangeFrequency, ImageEntry, ImageField, ImageSource, LastModified, UrlEntry};
pub use error::{Error, Result};
pub use index::{SitemapIndex, SitemapIndexEntry, build_index, render_index};
pub use news::NewsEntry;
pub use normalize::normalize_location;
pub use session::{EntryHandle, SessionState, SessionSummary, SitemapSession};
pub use storage::SitemapStorage;
pub use video::{VideoEntry, VideoField};
