//! Archive codec boundary.
//!
//! A `.unitypackage` is a gzip-compressed tar stream. The resolver never
//! touches compressed bytes itself: it works on the flat list of
//! [`ArchiveEntry`] values an [`ArchiveCodec`] produces, and hands a rebuilt
//! list back to the codec for encoding.
//!
//! [`TarGzCodec`] is the codec used by [`UnityPackage`](crate::UnityPackage)
//! unless another one is supplied.
//!
//! # Example
//!
//! ```rust
//! use unitypack::ArchiveEntry;
//! use unitypack::codec::{ArchiveCodec, CodecOptions, TarGzCodec};
//!
//! let codec = TarGzCodec::new(CodecOptions::new().level(9)?);
//! let bytes = codec.encode(&[ArchiveEntry::file("guid/asset", b"data".to_vec())])?;
//! let entries = codec.decode(&bytes)?;
//! assert_eq!(entries[0].name, "guid/asset");
//! # Ok::<(), unitypack::Error>(())
//! ```

mod targz;

pub use targz::TarGzCodec;

use crate::{ArchiveEntry, Result};

/// Magic bytes at the start of every gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Default gzip compression level.
pub const DEFAULT_LEVEL: u32 = 6;

/// Converts between archive bytes and a flat list of entries.
///
/// Implementations report failures as [`Error::Codec`](crate::Error::Codec)
/// (or another descriptive variant); they never return a partial entry list.
pub trait ArchiveCodec {
    /// Decodes archive bytes into entries, in archive order.
    fn decode(&self, bytes: &[u8]) -> Result<Vec<ArchiveEntry>>;

    /// Encodes entries into archive bytes, in slice order.
    fn encode(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>>;
}

impl<C: ArchiveCodec + ?Sized> ArchiveCodec for &C {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
        (**self).decode(bytes)
    }

    fn encode(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
        (**self).encode(entries)
    }
}

/// Returns `true` if `bytes` start with the gzip magic number.
///
/// This is a cheap sniff used before decoding; it does not validate the
/// stream.
///
/// ```
/// use unitypack::codec::is_gzip;
///
/// assert!(is_gzip(&[0x1f, 0x8b, 0x08, 0x00]));
/// assert!(!is_gzip(b"PK\x03\x04"));
/// assert!(!is_gzip(&[]));
/// ```
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Limits enforced while decoding untrusted packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum number of entries (files and directories).
    pub max_entries: usize,
    /// Maximum unpacked size of a single entry.
    pub max_entry_size: u64,
    /// Maximum unpacked size of all entries together.
    pub max_total_size: u64,
}

impl Default for CodecLimits {
    /// Creates limits with the following default values:
    ///
    /// | Limit | Default Value |
    /// |-------|---------------|
    /// | `max_entries` | 1,000,000 |
    /// | `max_entry_size` | 4 GiB |
    /// | `max_total_size` | 64 GiB |
    fn default() -> Self {
        Self {
            max_entries: 1_000_000,
            max_entry_size: 4 << 30,
            max_total_size: 64 << 30,
        }
    }
}

impl CodecLimits {
    /// Creates limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates limits with no restrictions.
    pub fn unlimited() -> Self {
        Self {
            max_entries: usize::MAX,
            max_entry_size: u64::MAX,
            max_total_size: u64::MAX,
        }
    }

    /// Sets the maximum number of entries.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Sets the maximum size of a single entry.
    pub fn max_entry_size(mut self, max: u64) -> Self {
        self.max_entry_size = max;
        self
    }

    /// Sets the maximum total unpacked size.
    pub fn max_total_size(mut self, max: u64) -> Self {
        self.max_total_size = max;
        self
    }
}

/// Options for [`TarGzCodec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Gzip compression level (0-9).
    pub level: u32,
    /// Modification time written into every tar header (seconds since the
    /// Unix epoch). Defaults to 0 so that equal entries encode to equal bytes.
    pub mtime: u64,
    /// Limits enforced while decoding.
    pub limits: CodecLimits,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            mtime: 0,
            limits: CodecLimits::default(),
        }
    }
}

impl CodecOptions {
    /// Creates options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level (0-9).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCompressionLevel`] if `level > 9`.
    ///
    /// [`Error::InvalidCompressionLevel`]: crate::Error::InvalidCompressionLevel
    pub fn level(mut self, level: u32) -> Result<Self> {
        if level > 9 {
            return Err(crate::Error::InvalidCompressionLevel { level });
        }
        self.level = level;
        Ok(self)
    }

    /// Sets the compression level, clamping values above 9.
    pub fn level_clamped(mut self, level: u32) -> Self {
        self.level = level.min(9);
        self
    }

    /// Sets the mtime written into tar headers.
    pub fn mtime(mut self, mtime: u64) -> Self {
        self.mtime = mtime;
        self
    }

    /// Sets the decoding limits.
    pub fn limits(mut self, limits: CodecLimits) -> Self {
        self.limits = limits;
        self
    }
}
