//! The `.unitypackage` facade.
//!
//! [`UnityPackage`] ties the pieces together: it decodes archive bytes with an
//! [`ArchiveCodec`], resolves the entries into a [`PackageIndex`], hands clip
//! assets to a [`ClipEditor`] and writes edits back.

use std::fs;
use std::path::Path;

use crate::anim::ClipEditor;
use crate::codec::{ArchiveCodec, TarGzCodec};
use crate::edit::{EditResult, PackageEditor};
use crate::resolve::{PackageIndex, PackageStats};
use crate::{ArchiveEntry, Error, Result};

/// A decoded package: its archive entries and the asset index resolved from
/// them.
///
/// The index is never patched. Every edit produces a new entry set through
/// [`PackageIndex::rebuild`] and a new index parsed from it, so after an edit
/// [`entries`](Self::entries) holds only the asset entries; directory entries
/// and entries outside the asset layout are not carried over.
///
/// # Example
///
/// ```rust,no_run
/// use unitypack::{Result, UnityPackage};
///
/// fn main() -> Result<()> {
///     let mut package = UnityPackage::open_path("Characters.unitypackage")?;
///
///     for path in package.index().list_assets() {
///         println!("{}", path);
///     }
///
///     let mut clip = package.load_clip("Assets/Anim/Walk.anim")?;
///     clip.clip_mut().set_name("Walk_Edited");
///     package.store_clip("Assets/Anim/Walk.anim", &clip)?;
///
///     package.save_path("Characters_edited.unitypackage")?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct UnityPackage {
    entries: Vec<ArchiveEntry>,
    index: PackageIndex,
}

impl UnityPackage {
    /// Decodes a package with the default [`TarGzCodec`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the bytes are not gzip data, and
    /// [`Error::Codec`] or [`Error::ResourceLimitExceeded`] if decoding fails.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(&TarGzCodec::default(), bytes)
    }

    /// Decodes a package with the given codec.
    pub fn from_bytes_with<C: ArchiveCodec>(codec: &C, bytes: &[u8]) -> Result<Self> {
        let entries = codec.decode(bytes)?;
        Ok(Self::from_entries(entries))
    }

    /// Reads and decodes a package file with the default codec.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(&bytes)
    }

    /// Resolves an already decoded entry list.
    pub fn from_entries(entries: Vec<ArchiveEntry>) -> Self {
        let index = PackageIndex::parse(&entries);
        Self { entries, index }
    }

    /// Returns the asset index.
    pub fn index(&self) -> &PackageIndex {
        &self.index
    }

    /// Returns the archive entries.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Consumes the package, returning its archive entries.
    pub fn into_entries(self) -> Vec<ArchiveEntry> {
        self.entries
    }

    /// Returns asset statistics.
    pub fn stats(&self) -> PackageStats {
        self.index.stats()
    }

    /// Returns a text payload as a clip editor.
    ///
    /// Any text asset is accepted; a payload without an `AnimationClip`
    /// record loads in the degraded state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetNotFound`] if no asset has the given path and
    /// [`Error::InvalidText`] if its payload is not UTF-8.
    pub fn load_clip(&self, asset_path: &str) -> Result<ClipEditor> {
        let record = self.index.get(asset_path).ok_or_else(|| Error::AssetNotFound {
            path: asset_path.to_string(),
        })?;
        let text = std::str::from_utf8(record.bytes()).map_err(|source| Error::InvalidText {
            path: asset_path.to_string(),
            source,
        })?;
        Ok(ClipEditor::load(text))
    }

    /// Replaces the payload of an asset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetNotFound`] if no asset has the given path.
    pub fn replace_asset(&mut self, asset_path: &str, bytes: impl Into<Vec<u8>>) -> Result<()> {
        let mut editor = PackageEditor::new(&self.index);
        editor.update(asset_path, bytes)?;
        let result = editor.apply()?;
        self.supersede(result);
        Ok(())
    }

    /// Exports a clip and stores it as the payload of an asset.
    ///
    /// An editor without changes leaves the package untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClipExport`] if the clip cannot be exported and
    /// [`Error::AssetNotFound`] if no asset has the given path.
    pub fn store_clip(&mut self, asset_path: &str, clip: &ClipEditor) -> Result<()> {
        if !self.index.has_asset(asset_path) {
            return Err(Error::AssetNotFound {
                path: asset_path.to_string(),
            });
        }
        if !clip.is_modified() {
            return Ok(());
        }
        let text = clip.export()?;
        self.replace_asset(asset_path, text.into_bytes())
    }

    /// Replaces the package contents with the outcome of a
    /// [`PackageEditor`] run.
    pub fn supersede(&mut self, result: EditResult) {
        self.entries = result.entries;
        self.index = result.index;
    }

    /// Encodes the package with the default codec.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with(&TarGzCodec::default())
    }

    /// Encodes the package with the given codec.
    pub fn to_bytes_with<C: ArchiveCodec>(&self, codec: &C) -> Result<Vec<u8>> {
        codec.encode(&self.entries)
    }

    /// Encodes the package with the default codec and writes it to a file.
    pub fn save_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        fs::write(path, &bytes)?;
        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

impl From<EditResult> for UnityPackage {
    fn from(result: EditResult) -> Self {
        Self {
            entries: result.entries,
            index: result.index,
        }
    }
}
