//! # unitypack
//!
//! A pure-Rust library for resolving and editing Unity `.unitypackage`
//! files.
//!
//! A `.unitypackage` is a gzip-compressed tar archive in which every asset
//! lives in a folder named after its GUID. This crate resolves those folders
//! into an asset index with path and GUID lookups, rebuilds packages from an
//! edited index, and edits the float curves of `AnimationClip` assets while
//! leaving every other byte of the clip document untouched.
//!
//! ## Quick Start
//!
//! ### Listing Assets
//!
//! ```rust,no_run
//! use unitypack::{Result, UnityPackage};
//!
//! fn main() -> Result<()> {
//!     let package = UnityPackage::open_path("Characters.unitypackage")?;
//!
//!     for record in package.index() {
//!         println!("{}  {} ({} bytes)", record.guid(), record.asset_path(), record.size());
//!     }
//!
//!     let stats = package.stats();
//!     println!("{} assets, {} bytes", stats.total_assets, stats.total_size);
//!     Ok(())
//! }
//! ```
//!
//! ### Editing an Animation Clip
//!
//! ```rust,no_run
//! use unitypack::anim::{FloatCurve, Keyframe};
//! use unitypack::{Result, UnityPackage};
//!
//! fn main() -> Result<()> {
//!     let mut package = UnityPackage::open_path("Characters.unitypackage")?;
//!     let mut editor = package.load_clip("Assets/Anim/Walk.anim")?;
//!
//!     let clip = editor.clip_mut();
//!     clip.remove_curve("m_LocalPosition.x", "Root");
//!     clip.add_curve(
//!         FloatCurve::new("m_LocalPosition.z", "Root")
//!             .with_keyframes([Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 2.0)]),
//!     );
//!
//!     package.store_clip("Assets/Anim/Walk.anim", &editor)?;
//!     package.save_path("Characters_edited.unitypackage")?;
//!     Ok(())
//! }
//! ```
//!
//! ### Editing Assets
//!
//! ```rust,no_run
//! use unitypack::edit::PackageEditor;
//! use unitypack::{AssetPath, Result, UnityPackage};
//!
//! fn main() -> Result<()> {
//!     let mut package = UnityPackage::open_path("Characters.unitypackage")?;
//!
//!     let mut editor = PackageEditor::new(package.index());
//!     editor.rename("Assets/Old.png", AssetPath::new("Assets/Icons/New.png")?)?;
//!     editor.delete("Assets/Unused.mat")?;
//!     let result = editor.apply()?;
//!     println!("{} renamed, {} deleted", result.assets_renamed, result.assets_deleted);
//!
//!     package.supersede(result);
//!     package.save_path("Characters_edited.unitypackage")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `async` | No | Async file I/O with Tokio |
//! | `cli` | No | Command-line interface tool |
//!
//! ## Async API
//!
//! Enable the `async` feature for Tokio-based file I/O:
//!
//! ```rust,ignore
//! # #[cfg(feature = "async")]
//! use unitypack::{Result, UnityPackage};
//!
//! # #[cfg(feature = "async")]
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let package = UnityPackage::open_path_async("Characters.unitypackage").await?;
//!     package.save_path_async("copy.unitypackage").await?;
//!     Ok(())
//! }
//! # #[cfg(not(feature = "async"))]
//! # fn main() {}
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`], which is an alias for
//! `std::result::Result<T, Error>`. Malformed package contents are not
//! errors: incomplete asset folders are skipped while resolving, and a clip
//! document without a readable `AnimationClip` record loads in a degraded
//! state with an empty curve list.
//!
//! ## Safety and Resource Limits
//!
//! Decoding enforces [`CodecLimits`](codec::CodecLimits) on the entry count,
//! the size of a single entry and the total unpacked size, so that hostile
//! packages cannot exhaust memory.
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod anim;
pub mod asset_path;
pub mod codec;
pub mod edit;
pub mod entry;
pub mod error;
pub mod package;
pub mod resolve;

// Async module (requires "async" feature)
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub mod async_package;

pub use asset_path::AssetPath;
pub use entry::ArchiveEntry;
pub use error::{CodecOperation, Error, Result};
pub use package::UnityPackage;

// Re-export resolver API at crate root for convenience
pub use resolve::{AssetRecord, PackageIndex, PackageStats};

// Re-export clip API at crate root for convenience
pub use anim::{AnimationClip, ClipEditor, ClipState, FloatCurve, Keyframe};

// Re-export edit API
pub use edit::{EditResult, Operation, OperationBuilder, PackageEditor};

// Re-export codec API
pub use codec::{ArchiveCodec, CodecLimits, CodecOptions, TarGzCodec};
