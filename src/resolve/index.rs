//! Asset index built from package entries.

use std::collections::{BTreeMap, HashMap};

use super::stats::PackageStats;
use crate::ArchiveEntry;

/// Name of the entry holding an asset's project path.
pub const PATHNAME_FILE: &str = "pathname";
/// Name of the entry holding an asset's payload.
pub const ASSET_FILE: &str = "asset";
/// Name of the optional entry holding an asset's `.meta` text.
pub const META_FILE: &str = "asset.meta";

/// One logical asset of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    guid: String,
    asset_path: String,
    asset_bytes: Vec<u8>,
    meta_text: Option<String>,
}

impl AssetRecord {
    pub(crate) fn new(
        guid: impl Into<String>,
        asset_path: impl Into<String>,
        asset_bytes: Vec<u8>,
        meta_text: Option<String>,
    ) -> Self {
        Self {
            guid: guid.into(),
            asset_path: asset_path.into(),
            asset_bytes,
            meta_text,
        }
    }

    /// Returns the asset GUID (the entry folder name).
    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// Returns the project path, e.g. `Assets/Anim/Walk.anim`.
    pub fn asset_path(&self) -> &str {
        &self.asset_path
    }

    /// Returns the raw asset payload.
    pub fn bytes(&self) -> &[u8] {
        &self.asset_bytes
    }

    /// Returns the `.meta` text, if the package carried one.
    pub fn meta_text(&self) -> Option<&str> {
        self.meta_text.as_deref()
    }

    /// Returns the payload size in bytes.
    pub fn size(&self) -> usize {
        self.asset_bytes.len()
    }

    pub(crate) fn set_asset_path(&mut self, asset_path: String) {
        self.asset_path = asset_path;
    }

    pub(crate) fn set_bytes(&mut self, bytes: Vec<u8>) {
        self.asset_bytes = bytes;
    }

    pub(crate) fn set_meta_text(&mut self, meta_text: Option<String>) {
        self.meta_text = meta_text;
    }

    /// Appends the entries describing this asset.
    fn push_entries(&self, entries: &mut Vec<ArchiveEntry>) {
        entries.push(ArchiveEntry::file(
            entry_name(&self.guid, PATHNAME_FILE),
            self.asset_path.as_bytes().to_vec(),
        ));
        entries.push(ArchiveEntry::file(
            entry_name(&self.guid, ASSET_FILE),
            self.asset_bytes.clone(),
        ));
        if let Some(meta) = &self.meta_text {
            entries.push(ArchiveEntry::file(
                entry_name(&self.guid, META_FILE),
                meta.as_bytes().to_vec(),
            ));
        }
    }
}

fn entry_name(guid: &str, file: &str) -> String {
    format!("{}/{}", guid, file)
}

/// Entries of one GUID folder, collected while grouping.
#[derive(Default)]
struct AssetGroup<'a> {
    pathname: Option<&'a ArchiveEntry>,
    asset: Option<&'a ArchiveEntry>,
    meta: Option<&'a ArchiveEntry>,
}

/// Resolved view of a package: assets keyed by path, with GUID lookups.
///
/// The GUID and path maps are always exact inverses of each other, and
/// their path keys are exactly the keys of the asset map. An index is never
/// edited in place; use [`PackageEditor`](crate::edit::PackageEditor) or
/// [`rebuild`](Self::rebuild) and [`parse`](Self::parse) to derive a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageIndex {
    assets: BTreeMap<String, AssetRecord>,
    guid_to_path: BTreeMap<String, String>,
    path_to_guid: BTreeMap<String, String>,
}

impl PackageIndex {
    /// Resolves flat archive entries into an asset index.
    ///
    /// Entries are grouped by their first name segment. In each group the
    /// second segment selects the role: `pathname`, `asset` or `asset.meta`.
    /// Directories, single-segment names and unknown roles are ignored, and a
    /// later entry with the same name replaces an earlier one.
    ///
    /// Groups without both `pathname` and `asset` are dropped. When two
    /// groups declare the same asset path, the group whose GUID appears later
    /// wins and the earlier GUID disappears from the index.
    ///
    /// This never fails: malformed input only yields a smaller index.
    pub fn parse(entries: &[ArchiveEntry]) -> Self {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, AssetGroup<'_>> = HashMap::new();

        for entry in entries.iter().filter(|e| !e.is_directory) {
            let Some((guid, file)) = entry.guid_and_file() else {
                continue;
            };
            let group = groups.entry(guid).or_insert_with(|| {
                order.push(guid);
                AssetGroup::default()
            });
            match file {
                ASSET_FILE => group.asset = Some(entry),
                META_FILE => group.meta = Some(entry),
                PATHNAME_FILE => group.pathname = Some(entry),
                _ => {}
            }
        }

        let mut index = Self::default();
        let mut dropped = 0usize;

        for guid in order {
            let group = &groups[guid];
            let (Some(pathname), Some(asset)) = (group.pathname, group.asset) else {
                log::debug!(
                    "Dropping incomplete asset group '{}' (pathname: {}, asset: {})",
                    guid,
                    group.pathname.is_some(),
                    group.asset.is_some()
                );
                dropped += 1;
                continue;
            };

            let asset_path = String::from_utf8_lossy(&pathname.bytes).trim().to_string();
            let meta_text = group
                .meta
                .map(|meta| String::from_utf8_lossy(&meta.bytes).into_owned());

            index.insert(AssetRecord::new(
                guid,
                asset_path,
                asset.bytes.clone(),
                meta_text,
            ));
        }

        log::debug!(
            "Resolved {} assets from {} entries ({} incomplete groups dropped)",
            index.len(),
            entries.len(),
            dropped
        );
        index
    }

    pub(crate) fn from_records(records: impl IntoIterator<Item = AssetRecord>) -> Self {
        let mut index = Self::default();
        for record in records {
            index.insert(record);
        }
        index
    }

    fn insert(&mut self, record: AssetRecord) {
        let path = record.asset_path.clone();
        let guid = record.guid.clone();

        if let Some(previous) = self.path_to_guid.get(&path) {
            if *previous != guid {
                log::warn!(
                    "Asset path '{}' declared by both '{}' and '{}'; keeping '{}'",
                    path,
                    previous,
                    guid,
                    guid
                );
                self.guid_to_path.remove(previous);
            }
        }
        if let Some(previous_path) = self.guid_to_path.get(&guid) {
            if *previous_path != path {
                self.path_to_guid.remove(previous_path);
                self.assets.remove(previous_path);
            }
        }

        self.guid_to_path.insert(guid.clone(), path.clone());
        self.path_to_guid.insert(path.clone(), guid);
        self.assets.insert(path, record);
    }

    /// Returns the number of assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Returns `true` if the index holds no assets.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Returns the asset stored at `asset_path`.
    pub fn get(&self, asset_path: &str) -> Option<&AssetRecord> {
        self.assets.get(asset_path)
    }

    /// Returns the asset with the given GUID.
    pub fn get_by_guid(&self, guid: &str) -> Option<&AssetRecord> {
        self.path_by_guid(guid).and_then(|path| self.assets.get(path))
    }

    /// Returns the GUID of the asset at `asset_path`.
    pub fn guid_by_path(&self, asset_path: &str) -> Option<&str> {
        self.path_to_guid.get(asset_path).map(String::as_str)
    }

    /// Returns the asset path of `guid`.
    pub fn path_by_guid(&self, guid: &str) -> Option<&str> {
        self.guid_to_path.get(guid).map(String::as_str)
    }

    /// Returns `true` if an asset exists at `asset_path`.
    pub fn has_asset(&self, asset_path: &str) -> bool {
        self.assets.contains_key(asset_path)
    }

    /// Returns `true` if an asset with `guid` exists.
    pub fn has_guid(&self, guid: &str) -> bool {
        self.guid_to_path.contains_key(guid)
    }

    /// Returns every asset whose path contains `pattern`.
    ///
    /// The match is a plain, case-sensitive substring test.
    pub fn find_by_pattern(&self, pattern: &str) -> Vec<&AssetRecord> {
        self.assets
            .iter()
            .filter(|(path, _)| path.contains(pattern))
            .map(|(_, record)| record)
            .collect()
    }

    /// Returns all asset paths in sorted order.
    pub fn list_assets(&self) -> Vec<&str> {
        self.assets.keys().map(String::as_str).collect()
    }

    /// Iterates over the assets in path order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetRecord> {
        self.assets.values()
    }

    /// Iterates over `(guid, path)` pairs in GUID order.
    pub fn guids(&self) -> impl Iterator<Item = (&str, &str)> {
        self.guid_to_path
            .iter()
            .map(|(guid, path)| (guid.as_str(), path.as_str()))
    }

    /// Rebuilds archive entries from this index.
    ///
    /// Every asset yields `<guid>/pathname` and `<guid>/asset`, plus
    /// `<guid>/asset.meta` when it has meta text. Parsing the result yields an
    /// index equal to `self`.
    pub fn rebuild(&self) -> Vec<ArchiveEntry> {
        let mut entries = Vec::with_capacity(self.assets.len() * 3);
        for record in self.assets.values() {
            record.push_entries(&mut entries);
        }
        entries
    }

    /// Computes aggregate statistics.
    pub fn stats(&self) -> PackageStats {
        PackageStats::from_records(self.assets.values())
    }
}

impl<'a> IntoIterator for &'a PackageIndex {
    type Item = &'a AssetRecord;
    type IntoIter = std::collections::btree_map::Values<'a, String, AssetRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.values()
    }
}
