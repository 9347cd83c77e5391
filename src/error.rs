//! Error types for package and clip operations.
//!
//! This module provides the [`Error`] enum which represents every failure
//! surfaced by this crate, along with a convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! Structural problems inside a package or a clip document are recovered
//! locally: malformed asset groups are dropped while resolving, and a clip
//! record that cannot be decoded loads in a degraded state. Errors are only
//! returned when a precondition is violated (a payload that is not UTF-8
//! text, a codec failure, an edit that names a missing asset) or when an
//! exported clip cannot carry its pending changes.
//!
//! ```rust,no_run
//! use unitypack::{Error, UnityPackage};
//!
//! fn open(path: &str) -> unitypack::Result<UnityPackage> {
//!     match UnityPackage::open_path(path) {
//!         Ok(package) => Ok(package),
//!         Err(Error::InvalidFormat(msg)) => {
//!             eprintln!("Not a .unitypackage file: {}", msg);
//!             Err(Error::InvalidFormat(msg))
//!         }
//!         Err(e @ Error::Codec { .. }) => {
//!             eprintln!("Package could not be decoded: {}", e);
//!             Err(e)
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use std::io;

/// Which direction of the archive codec failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecOperation {
    /// Decompressing and unpacking archive bytes into entries.
    Decode,
    /// Packing and compressing entries into archive bytes.
    Encode,
}

impl std::fmt::Display for CodecOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode => write!(f, "decode"),
            Self::Encode => write!(f, "encode"),
        }
    }
}

/// The main error type for package and clip operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io] | File system operations |
/// | Codec | [`InvalidFormat`][Self::InvalidFormat], [`Codec`][Self::Codec], [`ResourceLimitExceeded`][Self::ResourceLimitExceeded] | Archive bytes that cannot be unpacked |
/// | Editing | [`AssetNotFound`][Self::AssetNotFound], [`AssetExists`][Self::AssetExists], [`InvalidAssetPath`][Self::InvalidAssetPath], [`InvalidGuid`][Self::InvalidGuid] | Queued asset edits |
/// | Clip | [`InvalidText`][Self::InvalidText], [`ClipExport`][Self::ClipExport] | Animation clip payloads |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a gzip-compressed package.
    ///
    /// Returned before any decoding is attempted, when the magic bytes of
    /// the input do not match a gzip stream.
    #[error("Invalid package format: {0}")]
    InvalidFormat(String),

    /// The archive codec failed to decode or encode.
    ///
    /// The wrapped I/O error comes from the compression or tar layer and
    /// describes what was malformed.
    #[error("Failed to {operation} package archive: {source}")]
    Codec {
        /// Whether decoding or encoding failed.
        operation: CodecOperation,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },

    /// A resource limit was exceeded while decoding.
    ///
    /// See [`CodecLimits`](crate::codec::CodecLimits) for the configurable
    /// entry count and size limits.
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),

    /// An invalid compression level was provided.
    ///
    /// # Example
    ///
    /// ```rust
    /// use unitypack::{Error, codec::CodecOptions};
    ///
    /// assert!(CodecOptions::new().level(9).is_ok());
    /// let result = CodecOptions::new().level(15);
    /// assert!(matches!(result, Err(Error::InvalidCompressionLevel { level: 15 })));
    /// ```
    #[error("invalid compression level {level}: must be 0-9")]
    InvalidCompressionLevel {
        /// The invalid level that was provided.
        level: u32,
    },

    /// An asset path is invalid.
    ///
    /// Asset paths introduced through the editor must be non-empty, relative,
    /// free of NUL bytes and free of `.`/`..` segments.
    #[error("Invalid asset path: {0}")]
    InvalidAssetPath(String),

    /// An asset GUID is invalid.
    ///
    /// GUIDs become the first segment of every entry name of an asset, so
    /// they must be non-empty and must not contain `/` or NUL bytes.
    #[error("Invalid asset GUID '{guid}': {reason}")]
    InvalidGuid {
        /// The rejected GUID.
        guid: String,
        /// Why the GUID was rejected.
        reason: &'static str,
    },

    /// An asset was not found in the package.
    #[error("Asset not found: {path}")]
    AssetNotFound {
        /// The asset path that was not found.
        path: String,
    },

    /// An asset path or GUID is already taken.
    #[error("Asset already exists: {path}")]
    AssetExists {
        /// The path or GUID that already exists.
        path: String,
    },

    /// An asset payload expected to hold text is not valid UTF-8.
    #[error("Asset '{path}' is not valid UTF-8 text: {source}")]
    InvalidText {
        /// The asset path whose payload was rejected.
        path: String,
        /// The decoding failure.
        #[source]
        source: std::str::Utf8Error,
    },

    /// An animation clip could not be written back into its document.
    ///
    /// Returned only when a pending change (a new name or a new curve list)
    /// has no anchor in the original document, neither as a structured
    /// `AnimationClip` record nor as a plain field line.
    #[error("Cannot export animation clip: {0}")]
    ClipExport(String),
}

impl Error {
    /// Returns the asset path associated with this error, if any.
    ///
    /// # Example
    ///
    /// ```rust
    /// use unitypack::Error;
    ///
    /// fn log_error(error: &Error) {
    ///     if let Some(path) = error.asset_path() {
    ///         eprintln!("Error for '{}': {}", path, error);
    ///     }
    /// }
    /// ```
    pub fn asset_path(&self) -> Option<&str> {
        match self {
            Error::AssetNotFound { path } => Some(path.as_str()),
            Error::AssetExists { path } => Some(path.as_str()),
            Error::InvalidText { path, .. } => Some(path.as_str()),
            _ => None,
        }
    }

    /// Returns `true` if this error was raised by the archive codec.
    pub fn is_codec_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidFormat(_) | Error::Codec { .. } | Error::ResourceLimitExceeded(_)
        )
    }

    /// Creates a codec error for the given direction.
    pub(crate) fn codec(operation: CodecOperation, source: io::Error) -> Self {
        Error::Codec { operation, source }
    }
}

/// A specialized Result type for package and clip operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_invalid_format() {
        let err = Error::InvalidFormat("missing gzip magic".into());
        assert_eq!(
            err.to_string(),
            "Invalid package format: missing gzip magic"
        );
        assert!(err.is_codec_error());
    }

    #[test]
    fn test_codec_error_names_operation() {
        let err = Error::codec(
            CodecOperation::Decode,
            io::Error::new(io::ErrorKind::InvalidData, "corrupt deflate stream"),
        );
        let msg = err.to_string();
        assert!(msg.contains("decode"));
        assert!(msg.contains("corrupt deflate stream"));

        let err = Error::codec(CodecOperation::Encode, io::Error::other("disk full"));
        assert!(err.to_string().contains("encode"));
    }

    #[test]
    fn test_asset_path_accessor() {
        let err = Error::AssetNotFound {
            path: "Assets/Anim.anim".into(),
        };
        assert_eq!(err.asset_path(), Some("Assets/Anim.anim"));

        let err = Error::ClipExport("no anchor".into());
        assert_eq!(err.asset_path(), None);
        assert!(!err.is_codec_error());
    }

    #[test]
    fn test_invalid_text() {
        let bytes = [0x66, 0x6f, 0xff];
        let source = std::str::from_utf8(&bytes).unwrap_err();
        let err = Error::InvalidText {
            path: "Assets/Broken.anim".into(),
            source,
        };
        assert!(err.to_string().contains("Assets/Broken.anim"));
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_invalid_guid() {
        let err = Error::InvalidGuid {
            guid: "a/b".into(),
            reason: "contains '/'",
        };
        assert!(err.to_string().contains("a/b"));
        assert!(err.to_string().contains("contains '/'"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
