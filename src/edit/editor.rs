//! Package editor for modifying resolved packages.

use std::collections::{BTreeMap, BTreeSet};

use crate::resolve::{AssetRecord, PackageIndex};
use crate::{ArchiveEntry, AssetPath, Error, Result};

use super::operation::Operation;

/// Result of applying queued edits.
#[must_use = "edit result holds the new package contents"]
#[derive(Debug, Clone, Default)]
pub struct EditResult {
    /// Entries of the edited package, as produced by [`PackageIndex::rebuild`].
    pub entries: Vec<ArchiveEntry>,
    /// Index parsed from [`entries`](Self::entries).
    pub index: PackageIndex,
    /// Number of original assets left untouched.
    pub assets_kept: usize,
    /// Number of assets added.
    pub assets_added: usize,
    /// Number of assets deleted.
    pub assets_deleted: usize,
    /// Number of payload or meta updates.
    pub assets_updated: usize,
    /// Number of renames.
    pub assets_renamed: usize,
}

impl EditResult {
    /// Returns the number of assets in the edited package.
    pub fn total_assets(&self) -> usize {
        self.index.len()
    }

    /// Returns the total payload size of the edited package.
    pub fn total_bytes(&self) -> u64 {
        self.index.stats().total_size
    }
}

/// An editor for modifying the assets of a package.
///
/// Operations are validated when queued against the package as it will look
/// after every earlier operation, and only applied when [`apply`](Self::apply)
/// is called. The source index is never modified: applying produces a new
/// entry set and a fresh index parsed from it.
///
/// # Example
///
/// ```rust
/// use unitypack::{ArchiveEntry, AssetPath};
/// use unitypack::edit::PackageEditor;
/// use unitypack::resolve::PackageIndex;
///
/// let index = PackageIndex::parse(&[
///     ArchiveEntry::file("a1/pathname", b"Assets/Old.txt".to_vec()),
///     ArchiveEntry::file("a1/asset", b"hello".to_vec()),
/// ]);
///
/// let mut editor = PackageEditor::new(&index);
/// editor.rename("Assets/Old.txt", AssetPath::new("Assets/New.txt")?)?;
/// editor.add("b2", AssetPath::new("Assets/Other.txt")?, b"world".to_vec(), None)?;
///
/// let result = editor.apply()?;
/// assert_eq!(result.index.guid_by_path("Assets/New.txt"), Some("a1"));
/// assert_eq!(result.assets_added, 1);
/// # Ok::<(), unitypack::Error>(())
/// ```
pub struct PackageEditor<'a> {
    index: &'a PackageIndex,
    operations: Vec<Operation>,
    /// Path to GUID map once every queued operation is applied.
    projected: BTreeMap<String, String>,
}

impl<'a> PackageEditor<'a> {
    /// Creates a new editor for the given index.
    pub fn new(index: &'a PackageIndex) -> Self {
        Self {
            index,
            operations: Vec::new(),
            projected: projection(index),
        }
    }

    /// Returns the number of pending operations.
    pub fn pending_operations(&self) -> usize {
        self.operations.len()
    }

    /// Returns whether there are any pending operations.
    pub fn has_pending_operations(&self) -> bool {
        !self.operations.is_empty()
    }

    /// Returns the pending operations in queue order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Clears all pending operations.
    pub fn clear_operations(&mut self) {
        self.operations.clear();
        self.projected = projection(self.index);
    }

    /// Queues an add operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGuid`] for an empty GUID or one containing `/`
    /// or NUL, and [`Error::AssetExists`] if the GUID or the path is taken.
    pub fn add(
        &mut self,
        guid: impl Into<String>,
        path: AssetPath,
        data: impl Into<Vec<u8>>,
        meta: Option<String>,
    ) -> Result<()> {
        self.queue(Operation::Add {
            guid: guid.into(),
            path,
            data: data.into(),
            meta,
        })
    }

    /// Queues a delete operation.
    pub fn delete(&mut self, path: &str) -> Result<()> {
        self.queue(Operation::Delete {
            path: path.to_string(),
        })
    }

    /// Queues a payload update.
    pub fn update(&mut self, path: &str, data: impl Into<Vec<u8>>) -> Result<()> {
        self.queue(Operation::Update {
            path: path.to_string(),
            data: data.into(),
        })
    }

    /// Queues a meta text update. `None` drops the `.meta` entry.
    pub fn set_meta(&mut self, path: &str, meta: Option<String>) -> Result<()> {
        self.queue(Operation::SetMeta {
            path: path.to_string(),
            meta,
        })
    }

    /// Queues a rename. The asset keeps its GUID.
    pub fn rename(&mut self, from: &str, to: AssetPath) -> Result<()> {
        self.queue(Operation::Rename {
            from: from.to_string(),
            to,
        })
    }

    /// Validates and queues a single operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetNotFound`] if the operation reads a path that
    /// does not exist at this point of the queue, [`Error::AssetExists`] if it
    /// introduces a path or GUID that does, and [`Error::InvalidGuid`] for a
    /// malformed GUID. A rejected operation leaves the queue unchanged.
    pub fn queue(&mut self, operation: Operation) -> Result<()> {
        if let Some(source) = operation.source_path() {
            self.require_path(source)?;
        }

        match &operation {
            Operation::Add { guid, path, .. } => {
                validate_guid(guid)?;
                if self.projected.values().any(|taken| taken == guid) {
                    return Err(Error::AssetExists { path: guid.clone() });
                }
                self.require_free(path)?;
                self.projected.insert(path.to_string(), guid.clone());
            }
            Operation::Delete { path } => {
                self.projected.remove(path);
            }
            Operation::Rename { from, to } => {
                if from != to.as_str() {
                    self.require_free(to)?;
                    if let Some(guid) = self.projected.remove(from) {
                        self.projected.insert(to.to_string(), guid);
                    }
                }
            }
            Operation::Update { .. } | Operation::SetMeta { .. } => {}
        }

        log::debug!(
            "Queued {} of '{}'",
            operation.operation_type(),
            operation
                .target_path()
                .or(operation.source_path())
                .unwrap_or_default()
        );
        self.operations.push(operation);
        Ok(())
    }

    /// Validates and queues every operation in order.
    ///
    /// Stops at the first rejected operation; the ones before it stay queued.
    pub fn queue_all(&mut self, operations: impl IntoIterator<Item = Operation>) -> Result<()> {
        for operation in operations {
            self.queue(operation)?;
        }
        Ok(())
    }

    /// Applies all pending operations.
    ///
    /// Entries of the source package that are not part of an asset group are
    /// not carried over: the result is exactly [`PackageIndex::rebuild`] of the
    /// edited assets.
    pub fn apply(self) -> Result<EditResult> {
        let mut records: BTreeMap<String, AssetRecord> = self
            .index
            .iter()
            .map(|record| (record.asset_path().to_string(), record.clone()))
            .collect();
        let mut touched: BTreeSet<String> = BTreeSet::new();
        let mut result = EditResult::default();

        for operation in self.operations {
            match operation {
                Operation::Add {
                    guid,
                    path,
                    data,
                    meta,
                } => {
                    touched.insert(guid.clone());
                    records.insert(
                        path.to_string(),
                        AssetRecord::new(guid, path.into_string(), data, meta),
                    );
                    result.assets_added += 1;
                }
                Operation::Delete { path } => {
                    let record = take(&mut records, &path)?;
                    touched.insert(record.guid().to_string());
                    result.assets_deleted += 1;
                }
                Operation::Update { path, data } => {
                    let record = find(&mut records, &path)?;
                    record.set_bytes(data);
                    touched.insert(record.guid().to_string());
                    result.assets_updated += 1;
                }
                Operation::SetMeta { path, meta } => {
                    let record = find(&mut records, &path)?;
                    record.set_meta_text(meta);
                    touched.insert(record.guid().to_string());
                    result.assets_updated += 1;
                }
                Operation::Rename { from, to } => {
                    let mut record = take(&mut records, &from)?;
                    touched.insert(record.guid().to_string());
                    record.set_asset_path(to.to_string());
                    records.insert(to.into_string(), record);
                    result.assets_renamed += 1;
                }
            }
        }

        let edited = PackageIndex::from_records(records.into_values());
        result.entries = edited.rebuild();
        result.index = PackageIndex::parse(&result.entries);
        result.assets_kept = self
            .index
            .guids()
            .filter(|(guid, _)| !touched.contains(*guid))
            .count();

        log::debug!(
            "Applied edits: {} kept, {} added, {} deleted, {} updated, {} renamed",
            result.assets_kept,
            result.assets_added,
            result.assets_deleted,
            result.assets_updated,
            result.assets_renamed
        );
        Ok(result)
    }

    fn require_path(&self, path: &str) -> Result<()> {
        if self.projected.contains_key(path) {
            Ok(())
        } else {
            Err(Error::AssetNotFound {
                path: path.to_string(),
            })
        }
    }

    fn require_free(&self, path: &AssetPath) -> Result<()> {
        if self.projected.contains_key(path.as_str()) {
            Err(Error::AssetExists {
                path: path.to_string(),
            })
        } else {
            Ok(())
        }
    }
}

fn projection(index: &PackageIndex) -> BTreeMap<String, String> {
    index
        .guids()
        .map(|(guid, path)| (path.to_string(), guid.to_string()))
        .collect()
}

fn validate_guid(guid: &str) -> Result<()> {
    let reason = if guid.is_empty() {
        "empty GUID"
    } else if guid.contains('/') {
        "contains '/'"
    } else if guid.contains('\0') {
        "contains NUL byte"
    } else if guid.trim() != guid {
        "leading or trailing whitespace"
    } else {
        return Ok(());
    };
    Err(Error::InvalidGuid {
        guid: guid.to_string(),
        reason,
    })
}

fn take(records: &mut BTreeMap<String, AssetRecord>, path: &str) -> Result<AssetRecord> {
    records.remove(path).ok_or_else(|| Error::AssetNotFound {
        path: path.to_string(),
    })
}

fn find<'r>(records: &'r mut BTreeMap<String, AssetRecord>, path: &str) -> Result<&'r mut AssetRecord> {
    records.get_mut(path).ok_or_else(|| Error::AssetNotFound {
        path: path.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> PackageIndex {
        PackageIndex::parse(&[
            ArchiveEntry::file("a/pathname", b"Assets/A.txt".to_vec()),
            ArchiveEntry::file("a/asset", b"a".to_vec()),
            ArchiveEntry::file("a/asset.meta", b"meta-a".to_vec()),
            ArchiveEntry::file("b/pathname", b"Assets/B.txt".to_vec()),
            ArchiveEntry::file("b/asset", b"b".to_vec()),
        ])
    }

    fn path(s: &str) -> AssetPath {
        AssetPath::new(s).unwrap()
    }

    #[test]
    fn test_no_operations() {
        let index = sample_index();
        let result = PackageEditor::new(&index).apply().unwrap();
        assert_eq!(result.index, index);
        assert_eq!(result.assets_kept, 2);
        assert_eq!(result.total_assets(), 2);
        assert_eq!(result.total_bytes(), 2);
    }

    #[test]
    fn test_update_and_set_meta() {
        let index = sample_index();
        let mut editor = PackageEditor::new(&index);
        editor.update("Assets/B.txt", b"bbb".to_vec()).unwrap();
        editor.set_meta("Assets/A.txt", None).unwrap();
        let result = editor.apply().unwrap();

        assert_eq!(result.index.get("Assets/B.txt").unwrap().bytes(), b"bbb");
        assert_eq!(result.index.get("Assets/A.txt").unwrap().meta_text(), None);
        assert_eq!(result.assets_updated, 2);
        assert_eq!(result.assets_kept, 0);
        assert_eq!(result.entries.len(), 4);
    }

    #[test]
    fn test_rename_keeps_guid() {
        let index = sample_index();
        let mut editor = PackageEditor::new(&index);
        editor.rename("Assets/A.txt", path("Assets/Moved/A.txt")).unwrap();
        let result = editor.apply().unwrap();

        assert!(!result.index.has_asset("Assets/A.txt"));
        assert_eq!(result.index.path_by_guid("a"), Some("Assets/Moved/A.txt"));
        assert_eq!(
            result.index.get("Assets/Moved/A.txt").unwrap().meta_text(),
            Some("meta-a")
        );
        assert_eq!(result.assets_renamed, 1);
        assert_eq!(result.assets_kept, 1);
    }

    #[test]
    fn test_missing_path_rejected() {
        let index = sample_index();
        let mut editor = PackageEditor::new(&index);
        let err = editor.delete("Assets/Missing.txt").unwrap_err();
        assert!(matches!(err, Error::AssetNotFound { .. }));
        assert!(!editor.has_pending_operations());
    }

    #[test]
    fn test_collisions_rejected() {
        let index = sample_index();
        let mut editor = PackageEditor::new(&index);

        let err = editor
            .rename("Assets/A.txt", path("Assets/B.txt"))
            .unwrap_err();
        assert!(matches!(err, Error::AssetExists { .. }));

        let err = editor
            .add("a", path("Assets/C.txt"), Vec::new(), None)
            .unwrap_err();
        assert!(matches!(err, Error::AssetExists { path } if path == "a"));

        let err = editor
            .add("c", path("Assets/A.txt"), Vec::new(), None)
            .unwrap_err();
        assert!(matches!(err, Error::AssetExists { .. }));
    }

    #[test]
    fn test_invalid_guid_rejected() {
        let index = sample_index();
        let mut editor = PackageEditor::new(&index);
        for guid in ["", "a/b", "nul\0", " padded"] {
            let err = editor
                .add(guid, path("Assets/C.txt"), Vec::new(), None)
                .unwrap_err();
            assert!(matches!(err, Error::InvalidGuid { .. }), "{guid:?}");
        }
    }

    #[test]
    fn test_queue_follows_earlier_operations() {
        let index = sample_index();
        let mut editor = PackageEditor::new(&index);

        editor.delete("Assets/A.txt").unwrap();
        assert!(editor.update("Assets/A.txt", Vec::new()).is_err());

        // Both the path and the GUID of a deleted asset can be reused.
        editor
            .add("a", path("Assets/A.txt"), b"fresh".to_vec(), None)
            .unwrap();
        editor.rename("Assets/B.txt", path("Assets/C.txt")).unwrap();
        editor.update("Assets/C.txt", b"c".to_vec()).unwrap();

        let result = editor.apply().unwrap();
        assert_eq!(result.index.get("Assets/A.txt").unwrap().bytes(), b"fresh");
        assert_eq!(result.index.get("Assets/C.txt").unwrap().guid(), "b");
        assert_eq!(result.index.len(), 2);
    }

    #[test]
    fn test_renamed_guid_stays_reserved() {
        let index = sample_index();
        let mut editor = PackageEditor::new(&index);
        editor.rename("Assets/B.txt", path("Assets/C.txt")).unwrap();
        editor.delete("Assets/A.txt").unwrap();

        let err = editor
            .add("b", path("Assets/D.txt"), Vec::new(), None)
            .unwrap_err();
        assert!(matches!(err, Error::AssetExists { .. }));
    }

    #[test]
    fn test_clear_operations() {
        let index = sample_index();
        let mut editor = PackageEditor::new(&index);
        editor.delete("Assets/A.txt").unwrap();
        editor.clear_operations();
        assert_eq!(editor.pending_operations(), 0);
        editor.update("Assets/A.txt", Vec::new()).unwrap();
    }

    #[test]
    fn test_queue_all_stops_at_first_error() {
        let index = sample_index();
        let ops = crate::edit::OperationBuilder::new()
            .update("Assets/A.txt", b"new".to_vec())
            .delete("Assets/Missing.txt")
            .delete("Assets/B.txt")
            .build();

        let mut editor = PackageEditor::new(&index);
        assert!(editor.queue_all(ops).is_err());
        assert_eq!(editor.pending_operations(), 1);
        assert_eq!(editor.operations()[0].operation_type(), "update");
    }
}
