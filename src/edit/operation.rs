//! Package modification operations.

use crate::AssetPath;

/// A pending modification of a package's assets.
///
/// Existing assets are addressed by the path stored in the package; paths
/// that an operation introduces are validated [`AssetPath`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Add a new asset under a fresh GUID.
    Add {
        /// GUID folder of the new asset.
        guid: String,
        /// Path of the new asset.
        path: AssetPath,
        /// Asset payload.
        data: Vec<u8>,
        /// Optional `.meta` text.
        meta: Option<String>,
    },
    /// Delete an asset.
    Delete {
        /// Path to delete.
        path: String,
    },
    /// Replace an asset's payload.
    Update {
        /// Path to update.
        path: String,
        /// New payload.
        data: Vec<u8>,
    },
    /// Replace or clear an asset's `.meta` text.
    SetMeta {
        /// Path to update.
        path: String,
        /// New meta text, or `None` to drop the `.meta` entry.
        meta: Option<String>,
    },
    /// Move an asset to a new path, keeping its GUID.
    Rename {
        /// Current path.
        from: String,
        /// New path.
        to: AssetPath,
    },
}

impl Operation {
    /// Returns the path this operation leaves the asset at, if it survives.
    pub fn target_path(&self) -> Option<&str> {
        match self {
            Operation::Add { path, .. } => Some(path.as_str()),
            Operation::Delete { .. } => None,
            Operation::Update { path, .. } | Operation::SetMeta { path, .. } => Some(path),
            Operation::Rename { to, .. } => Some(to.as_str()),
        }
    }

    /// Returns the existing path this operation reads from.
    pub fn source_path(&self) -> Option<&str> {
        match self {
            Operation::Add { .. } => None,
            Operation::Delete { path }
            | Operation::Update { path, .. }
            | Operation::SetMeta { path, .. } => Some(path),
            Operation::Rename { from, .. } => Some(from),
        }
    }

    /// Returns the operation type as a string.
    pub fn operation_type(&self) -> &'static str {
        match self {
            Operation::Add { .. } => "add",
            Operation::Delete { .. } => "delete",
            Operation::Update { .. } => "update",
            Operation::SetMeta { .. } => "set-meta",
            Operation::Rename { .. } => "rename",
        }
    }
}

/// Builder for creating operations fluently.
///
/// The builder does not validate anything; hand the result to
/// [`PackageEditor::queue_all`](super::PackageEditor::queue_all).
#[derive(Debug, Default)]
pub struct OperationBuilder {
    operations: Vec<Operation>,
}

impl OperationBuilder {
    /// Creates a new operation builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an add operation.
    pub fn add(
        mut self,
        guid: impl Into<String>,
        path: AssetPath,
        data: impl Into<Vec<u8>>,
        meta: Option<String>,
    ) -> Self {
        self.operations.push(Operation::Add {
            guid: guid.into(),
            path,
            data: data.into(),
            meta,
        });
        self
    }

    /// Adds a delete operation.
    pub fn delete(mut self, path: impl Into<String>) -> Self {
        self.operations.push(Operation::Delete { path: path.into() });
        self
    }

    /// Adds an update operation.
    pub fn update(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.operations.push(Operation::Update {
            path: path.into(),
            data: data.into(),
        });
        self
    }

    /// Adds a set-meta operation.
    pub fn set_meta(mut self, path: impl Into<String>, meta: Option<String>) -> Self {
        self.operations.push(Operation::SetMeta {
            path: path.into(),
            meta,
        });
        self
    }

    /// Adds a rename operation.
    pub fn rename(mut self, from: impl Into<String>, to: AssetPath) -> Self {
        self.operations.push(Operation::Rename {
            from: from.into(),
            to,
        });
        self
    }

    /// Builds the list of operations.
    pub fn build(self) -> Vec<Operation> {
        self.operations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_paths() {
        let op = Operation::Rename {
            from: "Assets/Old.anim".into(),
            to: AssetPath::new("Assets/New.anim").unwrap(),
        };
        assert_eq!(op.source_path(), Some("Assets/Old.anim"));
        assert_eq!(op.target_path(), Some("Assets/New.anim"));

        let op = Operation::Delete {
            path: "Assets/Gone.png".into(),
        };
        assert_eq!(op.source_path(), Some("Assets/Gone.png"));
        assert_eq!(op.target_path(), None);

        let op = Operation::Add {
            guid: "g".into(),
            path: AssetPath::new("Assets/New.txt").unwrap(),
            data: vec![],
            meta: None,
        };
        assert!(op.source_path().is_none());
    }

    #[test]
    fn test_operation_builder() {
        let ops = OperationBuilder::new()
            .rename("Assets/a.txt", AssetPath::new("Assets/b.txt").unwrap())
            .delete("Assets/c.txt")
            .set_meta("Assets/d.txt", None)
            .add("e", AssetPath::new("Assets/e.txt").unwrap(), b"data".to_vec(), None)
            .build();

        let kinds: Vec<_> = ops.iter().map(Operation::operation_type).collect();
        assert_eq!(kinds, vec!["rename", "delete", "set-meta", "add"]);
    }
}
