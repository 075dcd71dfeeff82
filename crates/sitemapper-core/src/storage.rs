use crate::config::DEFAULT_OUTPUT;
use crate::{Result, compression};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Extension of plain sitemap files.
pub const XML_EXTENSION: &str = ".xml";

/// Extension of gzip-compressed sitemap files.
pub const GZIP_EXTENSION: &str = ".xml.gz";

/// Filesystem layout and writes for sitemap output.
///
/// Every file is derived from one base path: `<base>.xml` for a single sitemap or
/// the index, `<base><n>.xml` for rotated files, with `.xml.gz` when compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapStorage {
    base: PathBuf,
}

impl SitemapStorage {
    /// Create storage rooted at the given base path (no extension).
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Base path without index or extension
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// `.xml.gz` or `.xml`.
    #[must_use]
    pub const fn extension(compressed: bool) -> &'static str {
        if compressed { GZIP_EXTENSION } else { XML_EXTENSION }
    }

    /// Final component of the base path, used in index locations.
    #[must_use]
    pub fn base_name(&self) -> String {
        self.base
            .file_name()
            .map_or_else(|| DEFAULT_OUTPUT.to_string(), |name| name.to_string_lossy().into_owned())
    }

    /// Path of a sitemap file: `<base>[index]<extension>`.
    #[must_use]
    pub fn file_path(&self, index: Option<u32>, compressed: bool) -> PathBuf {
        let mut name = OsString::from(self.base.as_os_str());
        if let Some(index) = index {
            name.push(index.to_string());
        }
        name.push(Self::extension(compressed));
        PathBuf::from(name)
    }

    /// Path of the index file.
    #[must_use]
    pub fn index_path(&self, compressed: bool) -> PathBuf {
        self.file_path(None, compressed)
    }

    /// Write rendered XML to `path`, gzip-compressing it first if requested.
    ///
    /// Parent directories are created. The file is written next to its final
    /// location and renamed into place, so an existing file is replaced whole.
    #[instrument(level = "debug", skip(xml), fields(bytes = xml.len()))]
    pub fn write(&self, path: &Path, xml: &[u8], compressed: bool) -> Result<()> {
        let compressed_bytes;
        let bytes = if compressed {
            compressed_bytes = compression::compress(xml)?;
            compressed_bytes.as_slice()
        } else {
            xml
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| with_context(e, "Failed to create output directory", parent))?;
        }

        let mut tmp_name = OsString::from(path.as_os_str());
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        if let Err(e) = commit(&tmp_path, path, bytes) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Write `bytes` to `tmp_path` and rename it over `path`.
fn commit(tmp_path: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    fs::write(tmp_path, bytes).map_err(|e| with_context(e, "Failed to write", tmp_path))?;

    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path).map_err(|e| with_context(e, "Failed to remove existing", path))?;
    }

    fs::rename(tmp_path, path).map_err(|e| with_context(e, "Failed to commit", path))
}

/// Keep the error kind, prefix the message with what failed and where.
fn with_context(err: io::Error, action: &str, path: &Path) -> io::Error {
    io::Error::new(err.kind(), format!("{action} {}: {err}", path.display()))
}
