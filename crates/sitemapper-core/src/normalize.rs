//! Location normalization for sitemap entries.
//!
//! Turns the raw location a caller hands to the session into the absolute,
//! percent-encoded URL that ends up inside `<loc>`:
//!
//! - `http://` and `https://` locations are absolute; everything else is resolved
//!   against the configured site address.
//! - With auto-encoding on, every path segment is percent-encoded on its own
//!   (`/` stays a separator) and the query string is re-encoded pair by pair.
//! - With auto-encoding off, the location is used verbatim.
//!
//! ```
//! use sitemapper_core::normalize::normalize_location;
//!
//! let loc = normalize_location("/über uns?q=a b", Some("https://example.com"), true)?;
//! assert_eq!(loc, "https://example.com/%C3%BCber%20uns?q=a%20b");
//! # Ok::<(), sitemapper_core::Error>(())
//! ```
//!
//! The `&` joining query pairs is left as a plain ampersand here; the XML
//! renderer escapes it to `&amp;`.

use crate::{Error, Result};
use url::Url;

const SCHEMES: [&str; 2] = ["http://", "https://"];

/// Split an absolute `http(s)` location into its scheme prefix and remainder.
///
/// Returns `None` for relative locations, including a bare `http://` with
/// nothing after it.
fn split_absolute(raw: &str) -> Option<(&'static str, &str)> {
    SCHEMES.iter().find_map(|scheme| {
        raw.strip_prefix(scheme)
            .filter(|rest| !rest.is_empty())
            .map(|rest| (*scheme, rest))
    })
}

/// Returns `true` when `raw` is an absolute `http://` or `https://` location.
#[must_use]
pub fn is_absolute(raw: &str) -> bool {
    split_absolute(raw).is_some()
}

/// Normalize a raw location into the absolute URL written to the sitemap.
///
/// # Errors
///
/// - [`Error::Domain`] when `raw` is empty.
/// - [`Error::Config`] when `raw` is relative and no site address is configured.
pub fn normalize_location(raw: &str, site_address: Option<&str>, auto_encode: bool) -> Result<String> {
    if raw.is_empty() {
        return Err(Error::Domain("Location must not be empty".to_string()));
    }

    if let Some((scheme, rest)) = split_absolute(raw) {
        if !auto_encode {
            return Ok(raw.to_string());
        }
        let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
        let (authority, remainder) = rest.split_at(authority_end);
        let remainder = remainder.strip_prefix('/').unwrap_or(remainder);
        return Ok(format!("{scheme}{authority}/{}", encode_location(remainder)));
    }

    let site = site_address.ok_or_else(|| {
        Error::Config(format!(
            "Site address not set. Either give a full URL or configure a site address to resolve '{raw}'"
        ))
    })?;

    let relative = raw.trim_start_matches('/');
    if auto_encode {
        Ok(format!("{site}/{}", encode_location(relative)))
    } else {
        Ok(format!("{site}/{relative}"))
    }
}

/// Percent-encode a relative path with an optional query string.
///
/// Path segments are encoded independently with RFC 3986 rules (unreserved
/// characters pass through, `%` itself is encoded). A non-empty query is decoded
/// as form data and each key and value re-encoded.
#[must_use]
pub fn encode_location(path_and_query: &str) -> String {
    let (path, query) = match path_and_query.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path_and_query, None),
    };

    let mut encoded = encode_path(path);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        let query = encode_query(query);
        if !query.is_empty() {
            encoded.push('?');
            encoded.push_str(&query);
        }
    }
    encoded
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn encode_query(query: &str) -> String {
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| format!("{}={}", urlencoding::encode(&key), urlencoding::encode(&value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Validate and canonicalize a site address.
///
/// Trailing slashes are trimmed. The address must start with `http://` or
/// `https://` and parse as a URL.
///
/// # Errors
///
/// Returns [`Error::Config`] when the address is not an `http(s)` URL.
pub fn validate_site_address(address: &str) -> Result<String> {
    let trimmed = address.trim().trim_end_matches('/');

    if !is_absolute(trimmed) {
        return Err(Error::Config(format!(
            "Invalid site address '{address}'. The address should start with http:// or https://"
        )));
    }

    Url::parse(trimmed)
        .map_err(|e| Error::Config(format!("Invalid site address '{address}': {e}")))?;

    Ok(trimmed.to_string())
}
