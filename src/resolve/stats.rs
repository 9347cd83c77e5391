//! Aggregate statistics over a resolved package.

use std::collections::BTreeMap;

use super::index::AssetRecord;

/// Histogram key used for paths without an extension.
pub const UNKNOWN_EXTENSION: &str = "unknown";

/// Aggregate statistics for a [`PackageIndex`](super::PackageIndex).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageStats {
    /// Number of assets.
    pub total_assets: usize,
    /// Sum of all asset payload sizes, in bytes.
    pub total_size: u64,
    /// Asset count per lowercase file extension.
    pub asset_types: BTreeMap<String, usize>,
}

impl PackageStats {
    pub(crate) fn from_records<'a>(records: impl IntoIterator<Item = &'a AssetRecord>) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.total_assets += 1;
            stats.total_size += record.size() as u64;
            *stats
                .asset_types
                .entry(extension_key(record.asset_path()))
                .or_insert(0) += 1;
        }
        stats
    }

    /// Returns the mean payload size, or 0 for an empty package.
    pub fn average_asset_size(&self) -> u64 {
        if self.total_assets == 0 {
            0
        } else {
            self.total_size / self.total_assets as u64
        }
    }

    /// Returns the number of assets with the given extension.
    ///
    /// The lookup is case-insensitive; pass [`UNKNOWN_EXTENSION`] to count
    /// paths without one.
    pub fn count_for(&self, extension: &str) -> usize {
        self.asset_types
            .get(&extension.to_ascii_lowercase())
            .copied()
            .unwrap_or(0)
    }
}

/// Lowercased text after the last `.` of `path`, or [`UNKNOWN_EXTENSION`].
fn extension_key(path: &str) -> String {
    match path.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
        _ => UNKNOWN_EXTENSION.to_string(),
    }
}
