//! Fuzz target for AssetPath::new with arbitrary string input.
//!
//! Run with: cargo +nightly fuzz run asset_path
//!
//! Every accepted path must survive the resolver's `pathname` handling, so
//! the invariants below mirror what `PackageIndex::parse` does to a path.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(path_str) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(path) = unitypack::AssetPath::new(path_str) {
        let path = path.as_str();

        assert_eq!(path.trim(), path, "untrimmed path accepted: {:?}", path);
        assert!(!path.starts_with('/'), "absolute path accepted: {:?}", path);
        assert!(!path.contains('\0'), "NUL byte accepted: {:?}", path);
        assert!(
            !path.split('/').any(|s| s.is_empty() || s == "." || s == ".."),
            "bad segment accepted: {:?}",
            path
        );
    }
});
