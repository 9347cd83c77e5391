//! GUID asset resolution.
//!
//! Inside a `.unitypackage` every asset is stored as a folder named after its
//! GUID:
//!
//! ```text
//! <guid>/pathname     UTF-8 project path of the asset
//! <guid>/asset        raw asset payload
//! <guid>/asset.meta   optional importer settings (text)
//! ```
//!
//! [`PackageIndex::parse`] groups those flat entries into [`AssetRecord`]s
//! with path and GUID lookups, and [`PackageIndex::rebuild`] turns an index
//! back into entries. Groups missing `pathname` or `asset` are skipped rather
//! than failing the whole package.
//!
//! # Example
//!
//! ```rust
//! use unitypack::ArchiveEntry;
//! use unitypack::resolve::PackageIndex;
//!
//! let entries = vec![
//!     ArchiveEntry::file("9f1c/pathname", b"Assets/Hero.png\n".to_vec()),
//!     ArchiveEntry::file("9f1c/asset", vec![0x89, 0x50, 0x4e, 0x47]),
//!     ArchiveEntry::file("orphan/asset", b"no pathname".to_vec()),
//! ];
//!
//! let index = PackageIndex::parse(&entries);
//! assert_eq!(index.len(), 1);
//! assert_eq!(index.guid_by_path("Assets/Hero.png"), Some("9f1c"));
//! assert_eq!(index.path_by_guid("orphan"), None);
//!
//! let rebuilt = PackageIndex::parse(&index.rebuild());
//! assert_eq!(rebuilt, index);
//! ```

mod index;
mod stats;

pub use index::{ASSET_FILE, AssetRecord, META_FILE, PATHNAME_FILE, PackageIndex};
pub use stats::{PackageStats, UNKNOWN_EXTENSION};
