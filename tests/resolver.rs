//! Integration tests for GUID asset resolution.
//!
//! These tests verify that the resolver:
//! - Groups asset folders into records with path and GUID lookups
//! - Drops incomplete folders without failing
//! - Rebuilds entries that resolve back to the same index
//! - Reports statistics by file extension

mod common;

use unitypack::ArchiveEntry;
use unitypack::codec::{ArchiveCodec, TarGzCodec};
use unitypack::resolve::{PackageIndex, UNKNOWN_EXTENSION};

use common::{asset_entries, encode_package, sample_entries};

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_complete_and_incomplete_groups() {
    let mut entries = asset_entries(
        "complete",
        "Assets/Complete.txt",
        b"payload",
        Some("fileFormatVersion: 2\n"),
    );
    entries.push(ArchiveEntry::file("partial/asset", b"orphaned".to_vec()));

    let index = PackageIndex::parse(&entries);
    assert_eq!(index.len(), 1);
    assert_eq!(index.guid_by_path("Assets/Complete.txt"), Some("complete"));
    assert_eq!(index.path_by_guid("complete"), Some("Assets/Complete.txt"));
    assert_eq!(index.path_by_guid("partial"), None);
    assert!(index.guids().all(|(guid, _)| guid != "partial"));
    assert!(!index.has_guid("partial"));

    let record = index.get("Assets/Complete.txt").unwrap();
    assert_eq!(record.bytes(), b"payload");
    assert_eq!(record.meta_text(), Some("fileFormatVersion: 2\n"));
}

#[test]
fn test_pathname_is_trimmed() {
    let entries = [
        ArchiveEntry::file("g/pathname", b"Assets/Trimmed.mat\r\n".to_vec()),
        ArchiveEntry::file("g/asset", b"x".to_vec()),
    ];
    let index = PackageIndex::parse(&entries);
    assert!(index.has_asset("Assets/Trimmed.mat"));
}

#[test]
fn test_later_group_wins_path_collision() {
    let mut entries = asset_entries("first", "Assets/Same.txt", b"1", None);
    entries.extend(asset_entries("second", "Assets/Same.txt", b"2", None));

    let index = PackageIndex::parse(&entries);
    assert_eq!(index.len(), 1);
    assert_eq!(index.guid_by_path("Assets/Same.txt"), Some("second"));
    assert_eq!(index.path_by_guid("first"), None);
    assert_eq!(index.get("Assets/Same.txt").unwrap().bytes(), b"2");
}

#[test]
fn test_lookups_are_inverse() {
    let index = PackageIndex::parse(&sample_entries());
    assert_eq!(index.len(), 3);
    for (guid, path) in index.guids() {
        assert_eq!(index.guid_by_path(path), Some(guid));
        assert_eq!(index.get_by_guid(guid).unwrap().asset_path(), path);
    }
}

#[test]
fn test_queries() {
    let index = PackageIndex::parse(&sample_entries());

    let found: Vec<&str> = index
        .find_by_pattern("Assets/")
        .iter()
        .map(|r| r.asset_path())
        .collect();
    assert_eq!(found.len(), 3);
    assert!(index.find_by_pattern("assets/").is_empty());
    assert_eq!(index.find_by_pattern("Hero").len(), 1);

    assert_eq!(
        index.list_assets(),
        [
            "Assets/Animations/Test.anim",
            "Assets/Scripts/Player.cs",
            "Assets/Textures/Hero.PNG",
        ]
    );
    assert!(index.get("Assets/Missing").is_none());
    assert!(!index.has_asset("Assets/Missing"));
}

// ============================================================================
// Rebuilding
// ============================================================================

#[test]
fn test_rebuild_round_trip() {
    let index = PackageIndex::parse(&sample_entries());
    let rebuilt = index.rebuild();

    assert!(rebuilt.iter().all(|e| !e.is_directory));
    assert_eq!(rebuilt.len(), 3 * 2 + 2);
    assert_eq!(PackageIndex::parse(&rebuilt), index);
}

#[test]
fn test_rebuild_through_codec() {
    let index = PackageIndex::parse(&sample_entries());
    let bytes = encode_package(&index.rebuild());
    let decoded = TarGzCodec::default().decode(&bytes).unwrap();
    assert_eq!(PackageIndex::parse(&decoded), index);
}

#[test]
fn test_rebuild_omits_missing_meta() {
    let index = PackageIndex::parse(&sample_entries());
    let rebuilt = index.rebuild();
    assert!(
        !rebuilt
            .iter()
            .any(|e| e.name == "ffeeddccbbaa99887766554433221100/asset.meta")
    );
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_stats() {
    let mut entries = sample_entries();
    entries.extend(asset_entries("noext", "Assets/LICENSE", b"MIT", None));
    entries.extend(asset_entries("dot", "Assets/Trailing.", b"", None));

    let stats = PackageIndex::parse(&entries).stats();
    assert_eq!(stats.total_assets, 5);
    assert_eq!(
        stats.total_size,
        (common::SAMPLE_CLIP.len() + 8 + 23 + 3) as u64
    );
    assert_eq!(stats.count_for("png"), 1);
    assert_eq!(stats.count_for("PNG"), 1);
    assert_eq!(stats.count_for("anim"), 1);
    assert_eq!(stats.count_for("cs"), 1);
    assert_eq!(stats.asset_types.get(UNKNOWN_EXTENSION), Some(&2));
}

#[test]
fn test_empty_index() {
    let index = PackageIndex::parse(&[]);
    assert!(index.is_empty());
    assert!(index.rebuild().is_empty());
    let stats = index.stats();
    assert_eq!(stats.total_assets, 0);
    assert_eq!(stats.average_asset_size(), 0);
}
