//! Byte Sources - Atlas and Label Fetching
//!
//! A dataset load needs two independent resources: the sprite atlas and the
//! raw label array. `ByteSource` abstracts over where those bytes come from
//! (memory, file, HTTP); the two fetches of one load run concurrently and are
//! joined before decoding starts.
//!
//! @version 0.1.0
//! @author `Scrawl` Development Team

use std::path::{Path, PathBuf};

use crate::atlas::AtlasLayout;
use crate::error::{DataError, Result};

/// Leading magic bytes of a PNG payload.
const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

// =============================================================================
// ByteSource Trait
// =============================================================================

/// A byte-addressable resource reachable by a single fetch call.
pub trait ByteSource: Send + Sync {
    /// Human-readable name used in load errors.
    fn name(&self) -> String;

    /// Fetches the complete payload.
    fn fetch(&self) -> Result<Vec<u8>>;
}

// =============================================================================
// MemorySource
// =============================================================================

/// A source backed by an in-memory buffer.
///
/// Used by tests and by hosts that have already transferred the payload.
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    /// Creates a named in-memory source.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl ByteSource for MemorySource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn fetch(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

// =============================================================================
// FileSource
// =============================================================================

/// A source backed by a local file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a source reading from `path`.
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ByteSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| DataError::load(self.name(), e.to_string()))
    }
}

// =============================================================================
// HttpSource
// =============================================================================

/// A source fetched with a blocking HTTP GET.
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    /// Creates a source downloading from `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl ByteSource for HttpSource {
    fn name(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<u8>> {
        let response = reqwest::blocking::get(&self.url)
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| DataError::load(self.name(), e.to_string()))?;
        let bytes = response
            .bytes()
            .map_err(|e| DataError::load(self.name(), e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

// =============================================================================
// Payload Handling
// =============================================================================

/// Fetches the atlas and label payloads concurrently and joins the results.
///
/// Either failure surfaces as a load error; atlas failure wins when both
/// fetches fail.
pub fn fetch_pair(
    atlas_source: &dyn ByteSource,
    label_source: &dyn ByteSource,
) -> Result<(Vec<u8>, Vec<u8>)> {
    let (atlas, labels) = rayon::join(|| atlas_source.fetch(), || label_source.fetch());
    Ok((atlas?, labels?))
}

/// Turns a fetched atlas payload into a raw RGBA stream.
///
/// PNG payloads are decoded and their dimensions checked against the layout;
/// anything else is treated as an already-decoded RGBA stream and only
/// length-checked.
pub fn into_rgba(payload: Vec<u8>, layout: &AtlasLayout) -> Result<Vec<u8>> {
    if payload.starts_with(&PNG_MAGIC) {
        let img = image::load_from_memory(&payload)
            .map_err(|e| DataError::decode(format!("atlas PNG rejected: {e}")))?;
        let rgba = img.to_rgba8();
        layout.validate_image_dims(rgba.width() as usize, rgba.height() as usize)?;
        return Ok(rgba.into_raw());
    }

    if payload.len() != layout.rgba_len() {
        return Err(DataError::decode(format!(
            "raw atlas payload is {} bytes, layout requires {}",
            payload.len(),
            layout.rgba_len()
        )));
    }
    Ok(payload)
}

// =============================================================================
// Tests
// =============================================================================
