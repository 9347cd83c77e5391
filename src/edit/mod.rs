//! Asset-level package editing.
//!
//! This module modifies a resolved package by:
//! - Adding assets under new GUIDs
//! - Deleting assets
//! - Updating payloads and `.meta` text
//! - Renaming assets (the GUID is kept)
//!
//! # Example
//!
//! ```rust,no_run
//! use unitypack::{AssetPath, UnityPackage};
//! use unitypack::edit::PackageEditor;
//!
//! let package = UnityPackage::open_path("Characters.unitypackage")?;
//!
//! let mut editor = PackageEditor::new(package.index());
//! editor.rename("Assets/Old.mat", AssetPath::new("Assets/Materials/Old.mat")?)?;
//! editor.delete("Assets/Unused.png")?;
//! editor.set_meta("Assets/Hero.prefab", None)?;
//!
//! let result = editor.apply()?;
//! println!(
//!     "Kept {} assets, deleted {}, renamed {}",
//!     result.assets_kept, result.assets_deleted, result.assets_renamed
//! );
//!
//! let edited = UnityPackage::from_entries(result.entries);
//! edited.save_path("Characters-edited.unitypackage")?;
//! # Ok::<(), unitypack::Error>(())
//! ```
//!
//! # Implementation Notes
//!
//! The editor never patches an index in place. `apply()` replays the queued
//! operations on a copy of the asset records, rebuilds the entry list from
//! them and parses that list into a new index.

mod editor;
mod operation;

pub use editor::{EditResult, PackageEditor};
pub use operation::{Operation, OperationBuilder};
