//! Archive entries as produced and consumed by an [`ArchiveCodec`].
//!
//! [`ArchiveCodec`]: crate::codec::ArchiveCodec

/// One named blob inside a package archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry name, e.g. `0f3c.../asset`.
    pub name: String,
    /// Raw entry content. Empty for directories.
    pub bytes: Vec<u8>,
    /// Whether this entry is a directory.
    pub is_directory: bool,
}

impl ArchiveEntry {
    /// Creates a file entry.
    pub fn file(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            is_directory: false,
        }
    }

    /// Creates a directory entry.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bytes: Vec::new(),
            is_directory: true,
        }
    }

    /// Splits the entry name into its first segment (the asset GUID) and the
    /// second segment (the file inside the asset folder).
    ///
    /// Returns `None` for names with fewer than two segments. Deeper segments
    /// are not part of the asset layout and are ignored.
    ///
    /// ```
    /// use unitypack::ArchiveEntry;
    ///
    /// let entry = ArchiveEntry::file("abc123/pathname", b"Assets/a.png".to_vec());
    /// assert_eq!(entry.guid_and_file(), Some(("abc123", "pathname")));
    /// assert_eq!(ArchiveEntry::file("loose", Vec::new()).guid_and_file(), None);
    /// ```
    pub fn guid_and_file(&self) -> Option<(&str, &str)> {
        let mut parts = self.name.split('/');
        let guid = parts.next()?;
        let file = parts.next()?;
        Some((guid, file))
    }

    /// Returns the size of the entry content in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the entry has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Returns every entry whose name contains `pattern` (case-sensitive).
pub fn find_entries<'a>(entries: &'a [ArchiveEntry], pattern: &str) -> Vec<&'a ArchiveEntry> {
    entries
        .iter()
        .filter(|entry| entry.name.contains(pattern))
        .collect()
}

/// Returns all entry names, sorted.
pub fn list_entries(entries: &[ArchiveEntry]) -> Vec<&str> {
    let mut names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
    names.sort_unstable();
    names
}
