//! Gzip encoding for `.xml.gz` output.
//!
//! Available with the `gzip` feature (on by default). Without it every call
//! fails with an [`std::io::ErrorKind::Unsupported`] I/O error.

use crate::Result;

/// Whether this build can write compressed output.
#[must_use]
pub const fn is_available() -> bool {
    cfg!(feature = "gzip")
}

/// Gzip a byte slice at the best compression level.
#[cfg(feature = "gzip")]
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(input)?;
    Ok(encoder.finish()?)
}

/// Decompress gzip data.
#[cfg(feature = "gzip")]
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(compressed);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    Ok(decompressed)
}

/// Decompress gzip data as a UTF-8 string.
pub fn decompress_to_string(compressed: &[u8]) -> Result<String> {
    let decompressed = decompress(compressed)?;
    Ok(String::from_utf8(decompressed)?)
}

/// Always fails: built without gzip support.
#[cfg(not(feature = "gzip"))]
pub fn compress(_input: &[u8]) -> Result<Vec<u8>> {
    Err(unavailable())
}

/// Always fails: built without gzip support.
#[cfg(not(feature = "gzip"))]
pub fn decompress(_compressed: &[u8]) -> Result<Vec<u8>> {
    Err(unavailable())
}

#[cfg(not(feature = "gzip"))]
fn unavailable() -> crate::Error {
    std::io::Error::new(std::io::ErrorKind::Unsupported, "compression unavailable").into()
}
