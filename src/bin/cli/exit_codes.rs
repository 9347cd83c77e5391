//! Exit codes for the CLI tool.

use unitypack::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Query matched nothing
pub const NOT_FOUND: i32 = 1;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Package format error
pub const BAD_PACKAGE: i32 = 3;
/// Clip could not be edited
pub const BAD_CLIP: i32 = 4;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    NotFound,
    FatalError,
    BadPackage,
    BadClip,
    IoError,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::NotFound => NOT_FOUND,
            Self::FatalError => FATAL_ERROR,
            Self::BadPackage => BAD_PACKAGE,
            Self::BadClip => BAD_CLIP,
            Self::IoError => IO_ERROR,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a unitypack error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) => ExitCode::IoError,
        Error::InvalidFormat(_) | Error::Codec { .. } => ExitCode::BadPackage,
        Error::ResourceLimitExceeded(_) => ExitCode::FatalError,
        Error::InvalidCompressionLevel { .. } => ExitCode::BadArgs,
        Error::InvalidAssetPath(_) | Error::InvalidGuid { .. } => ExitCode::BadArgs,
        Error::AssetNotFound { .. } => ExitCode::NotFound,
        Error::AssetExists { .. } => ExitCode::BadArgs,
        Error::InvalidText { .. } | Error::ClipExport(_) => ExitCode::BadClip,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}
