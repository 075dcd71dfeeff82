//! Error types and handling for sitemapper-core operations.
//!
//! Every public operation returns [`Result<T, Error>`]. Errors are raised to the
//! immediate caller of the operation that detected them and are never retried
//! internally.
//!
//! ## Error Categories
//!
//! - **Configuration Errors**: missing or malformed site address, bad settings files
//! - **Domain Errors**: invalid entry data (unknown image/video keys, bad priority)
//! - **I/O Errors**: file writes, compression unavailable
//! - **XML Errors**: failures while rendering a document
//! - **Serialization Errors**: TOML settings conversion
//!
//! ```rust
//! use sitemapper_core::{Error, SiteConfig, SitemapSession};
//!
//! let config = SiteConfig::builder().build()?;
//! let mut session = SitemapSession::new(config);
//!
//! // No site address configured, so a relative location cannot be resolved.
//! match session.add_url("/about", None, None, None) {
//!     Err(Error::Config(msg)) => println!("configuration problem: {msg}"),
//!     Err(e) => println!("{} error: {e}", e.category()),
//!     Ok(_) => unreachable!(),
//! }
//! # Ok::<(), sitemapper_core::Error>(())
//! ```

use thiserror::Error;

/// The main error type for sitemapper-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers writing sitemap and index files, creating output directories and
    /// requesting compression when the crate was built without gzip support.
    ///
    /// ## Recoverability
    ///
    /// Interrupted and timed-out writes are recoverable; the in-memory document is
    /// left intact after a failed flush so the caller may retry.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or incomplete.
    ///
    /// ## Common Causes
    ///
    /// - Relative location added while no site address is configured
    /// - Site address that is not an `http://` or `https://` URL
    /// - Per-file capacity of zero
    /// - Unreadable or malformed settings file
    #[error("Configuration error: {0}")]
    Config(String),

    /// Entry data violates the sitemap data model.
    ///
    /// ## Common Causes
    ///
    /// - Unknown image or video field key
    /// - Image without a `loc`
    /// - Empty location
    /// - Priority outside `0.0..=1.0`
    /// - Entry handle that refers to an already flushed document
    #[error("Invalid sitemap data: {0}")]
    Domain(String),

    /// Rendering a document to XML failed.
    #[error("XML error: {0}")]
    Xml(String),

    /// Serialization or deserialization of settings failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable by retrying the same operation.
    ///
    /// Only transient I/O failures qualify. Configuration and domain errors are
    /// permanent: retrying with the same input fails the same way.
    ///
    /// ```rust
    /// use sitemapper_core::Error;
    /// use std::io;
    ///
    /// assert!(Error::Io(io::Error::new(io::ErrorKind::Interrupted, "signal")).is_recoverable());
    /// assert!(!Error::Domain("Unknown image field: bogus".into()).is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a static string identifier.
    ///
    /// - `"io"` - File system operations and compression availability
    /// - `"config"` - Site configuration and settings files
    /// - `"domain"` - Entry validation
    /// - `"xml"` - Document rendering
    /// - `"serialization"` - Settings format conversion
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Config(_) => "config",
            Self::Domain(_) => "domain",
            Self::Xml(_) => "xml",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::disallowed_macros,
    clippy::unwrap_used,
    clippy::unnecessary_wraps
)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io;

    #[test]
    fn test_error_display_formatting() {
        let errors = vec![
            Error::Config("site address not set".to_string()),
            Error::Domain("Unknown image field: bogus".to_string()),
            Error::Xml("unexpected end".to_string()),
            Error::Serialization("bad toml".to_string()),
        ];

        for error in errors {
            let error_string = error.to_string();
            match error {
                Error::Config(msg) => {
                    assert!(error_string.contains("Configuration error"));
                    assert!(error_string.contains(&msg));
                },
                Error::Domain(msg) => {
                    assert!(error_string.contains("Invalid sitemap data"));
                    assert!(error_string.contains(&msg));
                },
                Error::Xml(msg) => {
                    assert!(error_string.contains("XML error"));
                    assert!(error_string.contains(&msg));
                },
                Error::Serialization(msg) => {
                    assert!(error_string.contains("Serialization error"));
                    assert!(error_string.contains(&msg));
                },
                Error::Io(_) => unreachable!(),
            }
        }
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let error: Error = io_error.into();

        assert!(matches!(error, Error::Io(_)));
        assert!(error.to_string().contains("IO error"));
        assert!(error.to_string().contains("read-only"));
    }

    #[test]
    fn test_error_from_toml_error() {
        let parsed: std::result::Result<toml::Value, _> = toml::from_str("not = [valid");
        let error: Error = parsed.unwrap_err().into();
        assert_eq!(error.category(), "serialization");
    }

    #[test]
    fn test_error_categories() {
        let cases = vec![
            (Error::Io(io::Error::other("disk")), "io"),
            (Error::Config("x".into()), "config"),
            (Error::Domain("x".into()), "domain"),
            (Error::Xml("x".into()), "xml"),
            (Error::Serialization("x".into()), "serialization"),
        ];

        for (error, expected) in cases {
            assert_eq!(error.category(), expected);
        }
    }

    #[test]
    fn test_error_recoverability() {
        assert!(Error::Io(io::Error::new(io::ErrorKind::TimedOut, "slow disk")).is_recoverable());
        assert!(Error::Io(io::Error::new(io::ErrorKind::Interrupted, "signal")).is_recoverable());

        assert!(!Error::Io(io::Error::new(io::ErrorKind::NotFound, "gone")).is_recoverable());
        assert!(!Error::Config("missing site".into()).is_recoverable());
        assert!(!Error::Domain("bad key".into()).is_recoverable());
    }

    #[test]
    fn test_error_chain_source() {
        use std::error::Error as StdError;

        let error: Error = io::Error::other("inner").into();
        assert!(error.source().is_some());
    }

    proptest! {
        #[test]
        fn test_domain_error_with_arbitrary_messages(msg in r".{0,500}") {
            let error = Error::Domain(msg.clone());
            prop_assert!(error.to_string().contains(&msg));
            prop_assert_eq!(error.category(), "domain");
        }
    }
}
