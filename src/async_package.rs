//! Async package I/O with Tokio.
//!
//! File access goes through `tokio::fs`; decoding and encoding run on the
//! blocking pool with [`tokio::task::spawn_blocking`], one codec call per
//! operation.
//!
//! # Example
//!
//! ```rust,ignore
//! use unitypack::{Result, UnityPackage};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let package = UnityPackage::open_path_async("Characters.unitypackage").await?;
//!     println!("{} assets", package.index().len());
//!     package.save_path_async("copy.unitypackage").await?;
//!     Ok(())
//! }
//! ```

use std::path::Path;

use crate::codec::{ArchiveCodec, TarGzCodec};
use crate::{Error, Result, UnityPackage};

impl UnityPackage {
    /// Reads and decodes a package file without blocking the runtime.
    pub async fn open_path_async(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await.map_err(Error::Io)?;
        Self::from_bytes_async(bytes).await
    }

    /// Decodes a package with the default codec on the blocking pool.
    pub async fn from_bytes_async(bytes: Vec<u8>) -> Result<Self> {
        let entries = tokio::task::spawn_blocking(move || TarGzCodec::default().decode(&bytes))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;
        Ok(Self::from_entries(entries))
    }

    /// Encodes the package with the default codec on the blocking pool and
    /// writes it to a file.
    pub async fn save_path_async(&self, path: impl AsRef<Path>) -> Result<()> {
        let entries = self.entries().to_vec();
        let bytes = tokio::task::spawn_blocking(move || TarGzCodec::default().encode(&entries))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;
        tokio::fs::write(path.as_ref(), &bytes)
            .await
            .map_err(Error::Io)?;
        log::debug!("Wrote {} bytes to {}", bytes.len(), path.as_ref().display());
        Ok(())
    }
}
