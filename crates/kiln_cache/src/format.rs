//! On-disk encodings of the committed stamp table.
//!
//! [`TextFormat`] is the line-oriented `path=timestamp` table other tools
//! already read. [`BinaryFormat`] stores the same records behind a validated
//! header. Both sit behind [`CacheFormat`] so persistence never touches the
//! staleness logic.

use std::path::{Path, PathBuf};

use kiln_common::FileStamp;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CacheError;
use crate::table::StampMap;

/// Separator between the path and the timestamp in a text record.
const TEXT_DELIMITER: char = '=';

/// Magic bytes identifying a binary Kiln stamp cache.
const BINARY_MAGIC: [u8; 4] = *b"KILN";

/// Current binary format version. Increment on breaking changes to the
/// header or record layout.
const BINARY_FORMAT_VERSION: u32 = 1;

/// Serializer for the committed stamp table.
pub trait CacheFormat {
    /// Encodes every entry into the bytes of a cache file.
    fn encode(&self, entries: &StampMap) -> Result<Vec<u8>, CacheError>;

    /// Decodes the bytes of the cache file at `path`.
    ///
    /// `path` is only used for error reporting.
    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<StampMap, CacheError>;
}

/// One `absolutePath=integerEpochTimestamp` record per line.
///
/// Records are split on the first `=`. Lines without a delimiter are ignored
/// and lines whose timestamp does not parse are logged and skipped; neither
/// aborts the load. Paths containing `=` or that are not valid UTF-8 cannot be
/// represented and are left out when encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormat;

impl TextFormat {
    /// Parses a single line, returning `None` for lines without a record.
    fn parse_line(
        path: &Path,
        line_no: usize,
        line: &str,
    ) -> Option<Result<(PathBuf, FileStamp), CacheError>> {
        let (file, stamp) = line.split_once(TEXT_DELIMITER)?;
        Some(
            stamp
                .parse::<FileStamp>()
                .map(|stamp| (PathBuf::from(file), stamp))
                .map_err(|e| CacheError::Parse {
                    path: path.to_path_buf(),
                    line: line_no,
                    reason: e.to_string(),
                }),
        )
    }
}

impl CacheFormat for TextFormat {
    fn encode(&self, entries: &StampMap) -> Result<Vec<u8>, CacheError> {
        let mut sorted: Vec<_> = entries.iter().collect();
        sorted.sort();

        let mut out = String::new();
        for (file, stamp) in sorted {
            let Some(file) = file.to_str() else {
                warn!(
                    "cannot record {} in the text cache: path is not valid UTF-8",
                    file.display()
                );
                continue;
            };
            if file.contains(TEXT_DELIMITER) {
                warn!("cannot record {file} in the text cache: path contains '{TEXT_DELIMITER}'");
                continue;
            }
            out.push_str(file);
            out.push(TEXT_DELIMITER);
            out.push_str(&stamp.to_string());
            out.push('\n');
        }
        Ok(out.into_bytes())
    }

    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<StampMap, CacheError> {
        let text = String::from_utf8_lossy(bytes);
        let mut entries = StampMap::new();
        for (idx, line) in text.lines().enumerate() {
            match Self::parse_line(path, idx + 1, line) {
                Some(Ok((file, stamp))) => {
                    entries.insert(file, stamp);
                }
                Some(Err(e)) => warn!("skipping record: {e}"),
                None => {}
            }
        }
        Ok(entries)
    }
}

/// Header prepended to a binary cache for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BinaryHeader {
    /// Magic bytes: must be `b"KILN"`.
    magic: [u8; 4],

    /// Binary format version.
    format_version: u32,

    /// XXH3-64 of the encoded record payload.
    checksum: u64,
}

/// A single stamp record in the binary payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StampRecord {
    path: String,
    millis: i64,
}

/// Length-prefixed bincode records behind a checksummed header.
///
/// Layout: 4-byte little-endian header length, the bincode header, then the
/// bincode-encoded record list. Unlike the text table any UTF-8 path can be stored.
/// A damaged file fails as a whole, since a torn binary payload cannot be
/// resynchronized line by line.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryFormat;

impl CacheFormat for BinaryFormat {
    fn encode(&self, entries: &StampMap) -> Result<Vec<u8>, CacheError> {
        let mut records: Vec<StampRecord> = entries
            .iter()
            .filter_map(|(file, stamp)| match file.to_str() {
                Some(path) => Some(StampRecord {
                    path: path.to_owned(),
                    millis: stamp.as_millis(),
                }),
                None => {
                    warn!(
                        "cannot record {} in the binary cache: path is not valid UTF-8",
                        file.display()
                    );
                    None
                }
            })
            .collect();
        records.sort_by(|a, b| a.path.cmp(&b.path));

        let payload = bincode::serde::encode_to_vec(&records, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;

        let header = BinaryHeader {
            magic: BINARY_MAGIC,
            format_version: BINARY_FORMAT_VERSION,
            checksum: xxhash_rust::xxh3::xxh3_64(&payload),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;

        let header_len = header_bytes.len() as u32;
        let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
        output.extend_from_slice(&header_len.to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(&payload);
        Ok(output)
    }

    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<StampMap, CacheError> {
        let invalid = |reason: &str| CacheError::InvalidHeader {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let len_bytes: [u8; 4] = bytes
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| invalid("truncated header length"))?;
        let header_len = u32::from_le_bytes(len_bytes) as usize;
        let header_bytes = bytes
            .get(4..4 + header_len)
            .ok_or_else(|| invalid("truncated header"))?;

        let (header, _): (BinaryHeader, usize) =
            bincode::serde::decode_from_slice(header_bytes, bincode::config::standard())
                .map_err(|e| invalid(&e.to_string()))?;

        if header.magic != BINARY_MAGIC {
            return Err(invalid("missing magic bytes"));
        }
        if header.format_version != BINARY_FORMAT_VERSION {
            return Err(CacheError::VersionMismatch {
                path: path.to_path_buf(),
                expected: BINARY_FORMAT_VERSION,
                actual: header.format_version,
            });
        }

        let payload = &bytes[4 + header_len..];
        let actual = xxhash_rust::xxh3::xxh3_64(payload);
        if actual != header.checksum {
            return Err(CacheError::ChecksumMismatch {
                path: path.to_path_buf(),
                expected: header.checksum,
                actual,
            });
        }

        let (records, _): (Vec<StampRecord>, usize) =
            bincode::serde::decode_from_slice(payload, bincode::config::standard()).map_err(
                |e| CacheError::Serialization {
                    reason: e.to_string(),
                },
            )?;

        Ok(records
            .into_iter()
            .map(|r| (PathBuf::from(r.path), FileStamp::from_millis(r.millis)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StampMap {
        let mut map = StampMap::new();
        map.insert(
            PathBuf::from("/project/shaders/vs_pbr.sc"),
            FileStamp::from_millis(1_700_000_000_000),
        );
        map.insert(
            PathBuf::from("/project/textures/rock.png"),
            FileStamp::from_millis(-12),
        );
        map
    }

    #[test]
    fn text_encode_is_sorted_lines() {
        let bytes = TextFormat.encode(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "/project/shaders/vs_pbr.sc=1700000000000\n/project/textures/rock.png=-12\n"
        );
    }

    #[test]
    fn text_roundtrip() {
        let map = sample();
        let bytes = TextFormat.encode(&map).unwrap();
        let back = TextFormat.decode(Path::new("cache"), &bytes).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn text_skips_bad_lines_and_keeps_the_rest() {
        let input = b"/a.sc=10\n/b.sc=not-a-number\nno delimiter here\n\n/c.sc=30\r\n";
        let map = TextFormat.decode(Path::new("cache"), input).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[Path::new("/a.sc")], FileStamp::from_millis(10));
        assert_eq!(map[Path::new("/c.sc")], FileStamp::from_millis(30));
    }

    #[test]
    fn text_splits_on_first_delimiter() {
        let err = TextFormat::parse_line(Path::new("cache"), 3, "/a=b.sc=10")
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, CacheError::Parse { line: 3, .. }));
    }

    #[test]
    fn text_encode_drops_paths_with_delimiter() {
        let mut map = StampMap::new();
        map.insert(PathBuf::from("/odd=name.sc"), FileStamp::from_millis(1));
        map.insert(PathBuf::from("/fine.sc"), FileStamp::from_millis(2));
        let text = String::from_utf8(TextFormat.encode(&map).unwrap()).unwrap();
        assert_eq!(text, "/fine.sc=2\n");
    }

    #[cfg(unix)]
    #[test]
    fn text_encode_drops_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut map = StampMap::new();
        map.insert(
            PathBuf::from(OsStr::from_bytes(b"/assets/\xff.sc")),
            FileStamp::from_millis(1),
        );
        map.insert(PathBuf::from("/assets/ok.sc"), FileStamp::from_millis(2));
        let text = String::from_utf8(TextFormat.encode(&map).unwrap()).unwrap();
        assert_eq!(text, "/assets/ok.sc=2\n");
    }

    #[test]
    fn text_empty_file_is_empty_map() {
        assert!(TextFormat.decode(Path::new("cache"), b"").unwrap().is_empty());
    }

    #[test]
    fn binary_roundtrip_keeps_any_path() {
        let mut map = sample();
        map.insert(PathBuf::from("/odd=name.sc"), FileStamp::from_millis(3));
        let bytes = BinaryFormat.encode(&map).unwrap();
        let back = BinaryFormat.decode(Path::new("cache"), &bytes).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn binary_rejects_truncated_file() {
        let err = BinaryFormat.decode(Path::new("cache"), b"AB").unwrap_err();
        assert!(matches!(err, CacheError::InvalidHeader { .. }));
    }

    #[test]
    fn binary_rejects_text_file() {
        let text = TextFormat.encode(&sample()).unwrap();
        assert!(BinaryFormat.decode(Path::new("cache"), &text).is_err());
    }

    #[test]
    fn binary_detects_tampered_payload() {
        let mut bytes = BinaryFormat.encode(&sample()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let err = BinaryFormat.decode(Path::new("cache"), &bytes).unwrap_err();
        assert!(matches!(err, CacheError::ChecksumMismatch { .. }));
    }

    #[test]
    fn binary_rejects_other_version() {
        let payload =
            bincode::serde::encode_to_vec(Vec::<StampRecord>::new(), bincode::config::standard())
                .unwrap();
        let header = BinaryHeader {
            magic: BINARY_MAGIC,
            format_version: 999,
            checksum: xxhash_rust::xxh3::xxh3_64(&payload),
        };
        let header_bytes =
            bincode::serde::encode_to_vec(&header, bincode::config::standard()).unwrap();
        let mut bytes = (header_bytes.len() as u32).to_le_bytes().to_vec();
        bytes.extend_from_slice(&header_bytes);
        bytes.extend_from_slice(&payload);

        let err = BinaryFormat.decode(Path::new("cache"), &bytes).unwrap_err();
        assert!(matches!(
            err,
            CacheError::VersionMismatch {
                expected: 1,
                actual: 999,
                ..
            }
        ));
    }

    #[test]
    fn binary_rejects_wrong_magic() {
        let header = BinaryHeader {
            magic: *b"BAAD",
            format_version: BINARY_FORMAT_VERSION,
            checksum: 0,
        };
        let header_bytes =
            bincode::serde::encode_to_vec(&header, bincode::config::standard()).unwrap();
        let mut bytes = (header_bytes.len() as u32).to_le_bytes().to_vec();
        bytes.extend_from_slice(&header_bytes);

        let err = BinaryFormat.decode(Path::new("cache"), &bytes).unwrap_err();
        assert!(matches!(err, CacheError::InvalidHeader { .. }));
    }
}
