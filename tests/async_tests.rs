//! Integration tests for async API functionality.
//!
//! These tests verify async package reading and writing with the Tokio
//! runtime.

#![cfg(feature = "async")]

mod common;

use tempfile::TempDir;
use unitypack::{Error, UnityPackage};

use common::{encode_package, expect_err, sample_entries, sample_package};

#[tokio::test]
async fn test_open_path_async() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.unitypackage");
    tokio::fs::write(&path, encode_package(&sample_entries()))
        .await
        .unwrap();

    let package = UnityPackage::open_path_async(&path).await.unwrap();
    assert_eq!(package.index(), sample_package().index());
}

#[tokio::test]
async fn test_save_path_async_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("saved.unitypackage");

    let mut package = sample_package();
    package
        .replace_asset("Assets/Scripts/Player.cs", b"// async\n".to_vec())
        .unwrap();
    package.save_path_async(&path).await.unwrap();

    let reopened = UnityPackage::open_path(&path).unwrap();
    assert_eq!(
        reopened.index().get("Assets/Scripts/Player.cs").unwrap().bytes(),
        b"// async\n"
    );
}

#[tokio::test]
async fn test_from_bytes_async_rejects_garbage() {
    let err = expect_err(UnityPackage::from_bytes_async(b"not gzip".to_vec()).await);
    assert!(matches!(err, Error::InvalidFormat(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_opens() {
    let bytes = encode_package(&sample_entries());
    let tasks: Vec<_> = (0..4)
        .map(|_| tokio::spawn(UnityPackage::from_bytes_async(bytes.clone())))
        .collect();

    for task in tasks {
        let package = task.await.unwrap().unwrap();
        assert_eq!(package.index().len(), 3);
    }
}

#[tokio::test]
async fn test_open_missing_file_async() {
    let temp_dir = TempDir::new().unwrap();
    let err = expect_err(UnityPackage::open_path_async(temp_dir.path().join("missing")).await);
    assert!(matches!(err, Error::Io(_)));
}
