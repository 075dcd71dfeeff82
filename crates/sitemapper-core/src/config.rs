//! Site configuration for sitemap generation.
//!
//! Two layers, mirroring how the values are usually supplied:
//!
//! 1. **[`SiteConfig`]**: the immutable configuration a [`crate::SitemapSession`]
//!    runs with, built once through [`SiteConfig::builder`].
//! 2. **[`SitemapSettings`]**: an optional TOML file whose values seed a builder.
//!    Every field is optional and falls back to the builder defaults.
//!
//! ## Examples
//!
//! ### Building a configuration in code:
//!
//! ```rust
//! use sitemapper_core::SiteConfig;
//!
//! let config = SiteConfig::builder()
//!     .site_address("https://example.com/")
//!     .output("public/sitemap")
//!     .per_file(10_000)
//!     .auto_save(true)
//!     .build()?;
//!
//! assert_eq!(config.site_address(), Some("https://example.com"));
//! assert!(config.compression());
//! # Ok::<(), sitemapper_core::Error>(())
//! ```
//!
//! ### Settings file:
//!
//! ```toml
//! [site]
//! address = "https://example.com"
//!
//! [output]
//! path = "public/sitemap"
//! compress = true
//! per_file = 50000
//! rollover = true
//!
//! [encoding]
//! auto_encode = true
//! legacy_video_prefix = false
//! ```

use crate::normalize::{normalize_location, validate_site_address};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum number of URLs per sitemap file allowed by the sitemaps.org protocol.
pub const DEFAULT_PER_FILE: usize = 50_000;

/// Default output base path; files become `sitemap.xml`, `sitemap1.xml.gz`, ...
pub const DEFAULT_OUTPUT: &str = "sitemap";

/// Immutable configuration of one sitemap session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    site_address: Option<String>,
    auto_encode: bool,
    compression: bool,
    output: PathBuf,
    per_file: usize,
    auto_save: bool,
    legacy_video_prefix: bool,
}

impl SiteConfig {
    /// Start building a configuration with defaults: no site address,
    /// auto-encoding and compression on, output `sitemap`, 50 000 URLs per file,
    /// rollover off.
    #[must_use]
    pub fn builder() -> SiteConfigBuilder {
        SiteConfigBuilder::default()
    }

    /// Site address used to resolve relative locations, without trailing slash.
    #[must_use]
    pub fn site_address(&self) -> Option<&str> {
        self.site_address.as_deref()
    }

    /// Whether locations are percent-encoded.
    #[must_use]
    pub const fn auto_encode(&self) -> bool {
        self.auto_encode
    }

    /// Whether output files are gzip-compressed.
    #[must_use]
    pub const fn compression(&self) -> bool {
        self.compression
    }

    /// Output base path, without index suffix or extension.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Maximum number of URL entries per file in rollover mode.
    #[must_use]
    pub const fn per_file(&self) -> usize {
        self.per_file
    }

    /// Whether rollover (auto-save) is enabled.
    #[must_use]
    pub const fn auto_save(&self) -> bool {
        self.auto_save
    }

    /// Whether video fields are written with the historical `image:` prefix.
    #[must_use]
    pub const fn legacy_video_prefix(&self) -> bool {
        self.legacy_video_prefix
    }

    /// Normalize a raw location with this configuration's site address and
    /// encoding setting.
    pub fn normalize(&self, raw: &str) -> Result<String> {
        normalize_location(raw, self.site_address(), self.auto_encode)
    }

    /// Turn the configuration back into a builder, e.g. to derive a variant.
    #[must_use]
    pub fn to_builder(&self) -> SiteConfigBuilder {
        SiteConfigBuilder {
            site_address: self.site_address.clone(),
            auto_encode: self.auto_encode,
            compression: self.compression,
            output: self.output.clone(),
            per_file: self.per_file,
            auto_save: self.auto_save,
            legacy_video_prefix: self.legacy_video_prefix,
        }
    }
}

/// Builder for [`SiteConfig`]. Validation happens in [`SiteConfigBuilder::build`].
#[derive(Debug, Clone)]
pub struct SiteConfigBuilder {
    site_address: Option<String>,
    auto_encode: bool,
    compression: bool,
    output: PathBuf,
    per_file: usize,
    auto_save: bool,
    legacy_video_prefix: bool,
}

impl Default for SiteConfigBuilder {
    fn default() -> Self {
        Self {
            site_address: None,
            auto_encode: true,
            compression: true,
            output: PathBuf::from(DEFAULT_OUTPUT),
            per_file: DEFAULT_PER_FILE,
            auto_save: false,
            legacy_video_prefix: false,
        }
    }
}

impl SiteConfigBuilder {
    /// Site address (`http://` or `https://`) used for relative locations.
    #[must_use]
    pub fn site_address(mut self, address: impl Into<String>) -> Self {
        self.site_address = Some(address.into());
        self
    }

    /// Enable or disable percent-encoding of locations.
    #[must_use]
    pub const fn auto_encode(mut self, enabled: bool) -> Self {
        self.auto_encode = enabled;
        self
    }

    /// Enable or disable gzip output.
    #[must_use]
    pub const fn compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }

    /// Output base path.
    #[must_use]
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Maximum URL entries per file in rollover mode.
    #[must_use]
    pub const fn per_file(mut self, per_file: usize) -> Self {
        self.per_file = per_file;
        self
    }

    /// Enable or disable rollover across numbered files plus an index.
    #[must_use]
    pub const fn auto_save(mut self, enabled: bool) -> Self {
        self.auto_save = enabled;
        self
    }

    /// Write video fields under the `image:` prefix, reproducing older output.
    #[must_use]
    pub const fn legacy_video_prefix(mut self, enabled: bool) -> Self {
        self.legacy_video_prefix = enabled;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the site address is not an `http(s)` URL, the
    /// per-file capacity is zero or the output path is empty.
    pub fn build(self) -> Result<SiteConfig> {
        let site_address = self
            .site_address
            .as_deref()
            .map(validate_site_address)
            .transpose()?;

        if self.per_file == 0 {
            return Err(Error::Config(
                "Per-file capacity must be at least 1".to_string(),
            ));
        }

        if self.output.as_os_str().is_empty() {
            return Err(Error::Config("Output path must not be empty".to_string()));
        }

        Ok(SiteConfig {
            site_address,
            auto_encode: self.auto_encode,
            compression: self.compression,
            output: self.output,
            per_file: self.per_file,
            auto_save: self.auto_save,
            legacy_video_prefix: self.legacy_video_prefix,
        })
    }
}

/// Settings file contents.
///
/// Every value is optional; missing values keep the [`SiteConfig::builder`]
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapSettings {
    /// Site section.
    pub site: SiteSettings,
    /// Output section.
    pub output: OutputSettings,
    /// Encoding section.
    pub encoding: EncodingSettings,
}

/// `[site]` section of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Site address for relative locations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// `[output]` section of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output base path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Gzip output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compress: Option<bool>,
    /// URL entries per file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_file: Option<usize>,
    /// Rollover across numbered files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollover: Option<bool>,
}

/// `[encoding]` section of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingSettings {
    /// Percent-encode locations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_encode: Option<bool>,
    /// Historical `image:` prefix for video fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_video_prefix: Option<bool>,
}

impl SitemapSettings {
    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read settings: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse settings: {e}")))
    }

    /// Save settings as pretty TOML. The parent directory must exist.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Build a configuration from these settings alone.
    pub fn into_config(self) -> Result<SiteConfig> {
        self.into_builder().build()
    }

    /// Seed a builder with these settings.
    #[must_use]
    pub fn into_builder(self) -> SiteConfigBuilder {
        self.apply(SiteConfig::builder())
    }

    /// Overlay the values present in these settings onto `builder`.
    #[must_use]
    pub fn apply(self, mut builder: SiteConfigBuilder) -> SiteConfigBuilder {
        if let Some(address) = self.site.address {
            builder = builder.site_address(address);
        }
        if let Some(path) = self.output.path {
            builder = builder.output(path);
        }
        if let Some(compress) = self.output.compress {
            builder = builder.compression(compress);
        }
        if let Some(per_file) = self.output.per_file {
            builder = builder.per_file(per_file);
        }
        if let Some(rollover) = self.output.rollover {
            builder = builder.auto_save(rollover);
        }
        if let Some(auto_encode) = self.encoding.auto_encode {
            builder = builder.auto_encode(auto_encode);
        }
        if let Some(legacy) = self.encoding.legacy_video_prefix {
            builder = builder.legacy_video_prefix(legacy);
        }
        builder
    }
}
