//! Gzip-compressed tar codec.

use std::io::{self, Read};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tar::{EntryType, Header};

use super::{ArchiveCodec, CodecOptions, is_gzip};
use crate::error::CodecOperation;
use crate::{ArchiveEntry, Error, Result};

/// File mode written for regular entries.
const FILE_MODE: u32 = 0o644;
/// File mode written for directory entries.
const DIR_MODE: u32 = 0o755;

/// Codec for `.unitypackage` files: a tar stream inside a gzip member.
#[derive(Debug, Clone, Default)]
pub struct TarGzCodec {
    options: CodecOptions,
}

impl TarGzCodec {
    /// Creates a codec with the given options.
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    /// Returns the codec options.
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    fn decode_entries(&self, bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
        let limits = &self.options.limits;
        let mut archive = tar::Archive::new(GzDecoder::new(bytes));
        let mut entries = Vec::new();
        let mut total_size: u64 = 0;

        for entry in archive.entries().map_err(decode_error)? {
            let mut entry = entry.map_err(decode_error)?;
            let entry_type = entry.header().entry_type();
            let name = normalize_name(&entry.path_bytes());

            if !entry_type.is_file() && !entry_type.is_dir() {
                log::debug!("Skipping tar entry '{}' of type {:?}", name, entry_type);
                continue;
            }

            if entries.len() >= limits.max_entries {
                return Err(Error::ResourceLimitExceeded(format!(
                    "too many entries: more than {}",
                    limits.max_entries
                )));
            }

            if entry_type.is_dir() {
                entries.push(ArchiveEntry::directory(name));
                continue;
            }

            let size = entry.size();
            if size > limits.max_entry_size {
                return Err(Error::ResourceLimitExceeded(format!(
                    "entry '{}' is {} bytes, limit is {}",
                    name, size, limits.max_entry_size
                )));
            }
            total_size = total_size.saturating_add(size);
            if total_size > limits.max_total_size {
                return Err(Error::ResourceLimitExceeded(format!(
                    "total unpacked size exceeds {} bytes",
                    limits.max_total_size
                )));
            }

            let mut data = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
            entry.read_to_end(&mut data).map_err(decode_error)?;
            entries.push(ArchiveEntry::file(name, data));
        }

        Ok(entries)
    }

    fn encode_entries(&self, entries: &[ArchiveEntry]) -> io::Result<Vec<u8>> {
        let encoder = GzEncoder::new(Vec::new(), Compression::new(self.options.level));
        let mut builder = tar::Builder::new(encoder);

        for entry in entries {
            let mut header = Header::new_gnu();
            header.set_mtime(self.options.mtime);

            if entry.is_directory {
                header.set_entry_type(EntryType::Directory);
                header.set_mode(DIR_MODE);
                header.set_size(0);
                builder.append_data(&mut header, &entry.name, io::empty())?;
            } else {
                header.set_entry_type(EntryType::Regular);
                header.set_mode(FILE_MODE);
                header.set_size(entry.bytes.len() as u64);
                builder.append_data(&mut header, &entry.name, entry.bytes.as_slice())?;
            }
        }

        builder.into_inner()?.finish()
    }
}

impl ArchiveCodec for TarGzCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
        if !is_gzip(bytes) {
            return Err(Error::InvalidFormat(
                "input does not start with a gzip header".into(),
            ));
        }
        let entries = self.decode_entries(bytes)?;
        log::debug!("Decoded {} archive entries", entries.len());
        Ok(entries)
    }

    fn encode(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
        let bytes = self
            .encode_entries(entries)
            .map_err(|e| Error::codec(CodecOperation::Encode, e))?;
        log::debug!(
            "Encoded {} archive entries into {} bytes",
            entries.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

fn decode_error(e: io::Error) -> Error {
    Error::codec(CodecOperation::Decode, e)
}

/// Strips leading `./` segments and a trailing `/` from a tar entry name.
fn normalize_name(raw: &[u8]) -> String {
    let name = String::from_utf8_lossy(raw);
    let mut name: &str = &name;
    while let Some(rest) = name.strip_prefix("./") {
        name = rest;
    }
    name.strip_suffix('/').unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecLimits;

    fn sample_entries() -> Vec<ArchiveEntry> {
        vec![
            ArchiveEntry::directory("0123abcd"),
            ArchiveEntry::file("0123abcd/pathname", b"Assets/Walk.anim".to_vec()),
            ArchiveEntry::file("0123abcd/asset", b"%YAML 1.1\n".to_vec()),
        ]
    }

    #[test]
    fn test_encode_decode() {
        let codec = TarGzCodec::default();
        let bytes = codec.encode(&sample_entries()).unwrap();
        assert!(is_gzip(&bytes));

        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, sample_entries());
    }

    #[test]
    fn test_encode_is_deterministic() {
        let codec = TarGzCodec::default();
        let a = codec.encode(&sample_entries()).unwrap();
        let b = codec.encode(&sample_entries()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_long_entry_name() {
        let name = format!("{}/pathname", "g".repeat(150));
        let entries = vec![ArchiveEntry::file(name.clone(), b"Assets/a".to_vec())];
        let codec = TarGzCodec::default();
        let decoded = codec.decode(&codec.encode(&entries).unwrap()).unwrap();
        assert_eq!(decoded[0].name, name);
    }

    #[test]
    fn test_decode_rejects_non_gzip() {
        let err = TarGzCodec::default().decode(b"not a package").unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_decode_reports_corrupt_stream() {
        let codec = TarGzCodec::default();
        let mut bytes = codec.encode(&sample_entries()).unwrap();
        // First deflate block header: final block with reserved type 0b11.
        bytes[10] = 0xff;
        let err = codec.decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::Codec {
                operation: CodecOperation::Decode,
                ..
            }
        ));
    }

    #[test]
    fn test_entry_count_limit() {
        let bytes = TarGzCodec::default().encode(&sample_entries()).unwrap();
        let codec = TarGzCodec::new(CodecOptions::new().limits(CodecLimits::new().max_entries(2)));
        let err = codec.decode(&bytes).unwrap_err();
        assert!(matches!(err, Error::ResourceLimitExceeded(_)));
    }

    #[test]
    fn test_entry_size_limit() {
        let bytes = TarGzCodec::default().encode(&sample_entries()).unwrap();
        let codec =
            TarGzCodec::new(CodecOptions::new().limits(CodecLimits::new().max_entry_size(4)));
        let err = codec.decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("0123abcd/pathname"));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(b"./guid/asset"), "guid/asset");
        assert_eq!(normalize_name(b"guid/"), "guid");
        assert_eq!(normalize_name(b"guid/asset.meta"), "guid/asset.meta");
    }
}
