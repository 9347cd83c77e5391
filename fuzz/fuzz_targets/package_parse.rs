//! Fuzz target for decoding and resolving package bytes.
//!
//! Run with: cargo +nightly fuzz run package_parse
//!
//! Properties being tested:
//! - Decoding arbitrary bytes returns an error instead of panicking
//! - Resolved indexes survive a rebuild unchanged
//! - The path and GUID lookups stay inverse of each other

#![no_main]

use libfuzzer_sys::fuzz_target;
use unitypack::codec::{ArchiveCodec, CodecLimits, CodecOptions, TarGzCodec};
use unitypack::resolve::PackageIndex;

fuzz_target!(|data: &[u8]| {
    let limits = CodecLimits::new()
        .max_entries(10_000)
        .max_entry_size(16 << 20)
        .max_total_size(64 << 20);
    let codec = TarGzCodec::new(CodecOptions::new().limits(limits));

    let Ok(entries) = codec.decode(data) else {
        return;
    };

    let index = PackageIndex::parse(&entries);
    for (guid, path) in index.guids() {
        assert_eq!(index.guid_by_path(path), Some(guid));
    }

    let rebuilt = PackageIndex::parse(&index.rebuild());
    assert_eq!(rebuilt, index);
});
