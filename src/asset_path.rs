//! Validated asset path type for assets introduced through the editor.
//!
//! Paths read from an existing package are taken as-is by the resolver; this
//! type only guards paths that callers add or rename, so that every edited
//! package still resolves back to the same index.

use crate::{Error, Result};
use std::fmt;

/// Maximum length for asset paths (in bytes).
const MAX_PATH_LENGTH: usize = 32768;

/// A validated project-relative asset path such as `Assets/Anim/Walk.anim`.
///
/// `AssetPath` validates that:
/// - No NUL bytes or line breaks are present
/// - The path has no leading or trailing whitespace (the resolver trims
///   `pathname` entries, so such a path could not survive a round trip)
/// - The path is not absolute and has no trailing `/`
/// - No empty, `.` or `..` segments exist
///
/// # Examples
///
/// ```
/// use unitypack::AssetPath;
///
/// let path = AssetPath::new("Assets/Anim/Walk.anim").unwrap();
/// assert_eq!(path.file_name(), "Walk.anim");
/// assert_eq!(path.extension(), Some("anim"));
///
/// assert!(AssetPath::new("../Walk.anim").is_err());
/// assert!(AssetPath::new(" Assets/Walk.anim").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetPath(String);

impl AssetPath {
    /// Creates a new `AssetPath` from a string, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAssetPath`] if any of the rules listed on the
    /// type are violated.
    pub fn new(s: &str) -> Result<Self> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }

    fn validate(s: &str) -> Result<()> {
        if s.is_empty() {
            return Err(Error::InvalidAssetPath("empty path".into()));
        }

        if s.contains('\0') {
            return Err(Error::InvalidAssetPath("contains NUL byte".into()));
        }

        if s.contains(['\n', '\r']) {
            return Err(Error::InvalidAssetPath("contains line break".into()));
        }

        if s.len() > MAX_PATH_LENGTH {
            return Err(Error::InvalidAssetPath(format!(
                "path exceeds maximum length of {} bytes",
                MAX_PATH_LENGTH
            )));
        }

        if s.trim() != s {
            return Err(Error::InvalidAssetPath(
                "leading or trailing whitespace not allowed".into(),
            ));
        }

        if s.starts_with('/') {
            return Err(Error::InvalidAssetPath(
                "absolute path not allowed".into(),
            ));
        }

        if s.ends_with('/') {
            return Err(Error::InvalidAssetPath(
                "trailing slash not allowed".into(),
            ));
        }

        for segment in s.split('/') {
            if segment.is_empty() {
                return Err(Error::InvalidAssetPath(
                    "empty segment (consecutive slashes)".into(),
                ));
            }
            if segment == "." {
                return Err(Error::InvalidAssetPath("'.' segment not allowed".into()));
            }
            if segment == ".." {
                return Err(Error::InvalidAssetPath(
                    "'..' segment not allowed (path traversal)".into(),
                ));
            }
        }

        Ok(())
    }

    /// Returns the path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the path and returns the inner string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns the file name (last segment) of this path.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the file extension of the last segment, if any.
    ///
    /// A file name starting with a dot (e.g. `.gitkeep`) has no extension.
    pub fn extension(&self) -> Option<&str> {
        let file_name = self.file_name();
        let dot_pos = file_name.rfind('.')?;
        if dot_pos == 0 {
            None
        } else {
            Some(&file_name[dot_pos + 1..])
        }
    }

    /// Returns the parent folder of this path, if any.
    pub fn parent(&self) -> Option<Self> {
        self.0.rfind('/').map(|idx| Self(self.0[..idx].to_string()))
    }
}

impl AsRef<str> for AssetPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for AssetPath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for AssetPath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::validate(&s)?;
        Ok(Self(s))
    }
}
