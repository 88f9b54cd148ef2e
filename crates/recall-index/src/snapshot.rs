//! Binary snapshot format for one partition.
//!
//! ```text
//! magic "RVIX" | version u16 | dimensions u32 | count u64 | checksum [32]
//! zstd(body)
//! body = entry*
//! entry = str document_id | str partition_id | u32 n | (str key, str value)*n | f32*dimensions
//! str = u32 len | utf-8 bytes
//! ```
//!
//! checksum = blake3(magic | version | dimensions | count | body), so a
//! damaged header field fails verification like a damaged body.
//!
//! All integers and floats are little-endian. Entries are written in
//! insertion order so sequence numbers survive a round trip.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use recall_core::constants::SNAPSHOT_EXTENSION;
use recall_core::errors::PersistenceError;
use recall_core::models::VectorEntry;

const MAGIC: &[u8; 4] = b"RVIX";
const FORMAT_VERSION: u16 = 1;
const PREFIX_LEN: usize = 4 + 2 + 4 + 8;
const HEADER_LEN: usize = PREFIX_LEN + 32;
const ZSTD_LEVEL: i32 = 3;

/// Decoded snapshot contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub dimensions: usize,
    pub entries: Vec<VectorEntry>,
}

/// File path for a partition inside `dir`. Characters outside
/// `[A-Za-z0-9_-]` are replaced so any partition id maps to a file name.
pub fn snapshot_path(dir: &Path, partition_id: &str) -> PathBuf {
    let sanitized: String = partition_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    // Distinct ids that sanitize identically still get distinct files.
    let suffix = &blake3::hash(partition_id.as_bytes()).to_hex()[..8];
    dir.join(format!("{sanitized}-{suffix}.{SNAPSHOT_EXTENSION}"))
}

fn io_err(path: &Path, e: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn corrupt(path: &Path, details: impl Into<String>) -> PersistenceError {
    PersistenceError::Corrupt {
        path: path.display().to_string(),
        details: details.into(),
    }
}

fn put_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn checksum(prefix: &[u8], body: &[u8]) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(prefix);
    hasher.update(body);
    hasher.finalize()
}

fn encode_body(entries: &[VectorEntry]) -> Vec<u8> {
    let mut buf = Vec::new();
    for entry in entries {
        put_str(&mut buf, &entry.document_id);
        put_str(&mut buf, &entry.partition_id);
        let mut keys: Vec<&String> = entry.metadata.keys().collect();
        keys.sort();
        buf.extend_from_slice(&(keys.len() as u32).to_le_bytes());
        for key in keys {
            put_str(&mut buf, key);
            put_str(&mut buf, &entry.metadata[key]);
        }
        buf.extend(entry.vector.iter().flat_map(|f| f.to_le_bytes()));
    }
    buf
}

/// Write a snapshot atomically: temp file, fsync, rename.
pub fn write_snapshot(
    path: &Path,
    dimensions: usize,
    entries: &[VectorEntry],
) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let body = encode_body(entries);
    let compressed = zstd::encode_all(body.as_slice(), ZSTD_LEVEL).map_err(|e| io_err(path, e))?;

    let mut out = Vec::with_capacity(HEADER_LEN + compressed.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&(dimensions as u32).to_le_bytes());
    out.extend_from_slice(&(entries.len() as u64).to_le_bytes());
    let sum = checksum(&out[..PREFIX_LEN], &body);
    out.extend_from_slice(sum.as_bytes());
    out.extend_from_slice(&compressed);

    let tmp = path.with_extension(format!("{SNAPSHOT_EXTENSION}.tmp"));
    {
        let mut file = fs::File::create(&tmp).map_err(|e| io_err(&tmp, e))?;
        file.write_all(&out).map_err(|e| io_err(&tmp, e))?;
        file.sync_all().map_err(|e| io_err(&tmp, e))?;
    }
    fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

/// Cursor over the decompressed body.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    path: &'a Path,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], PersistenceError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| corrupt(self.path, format!("truncated at byte {}", self.pos)))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u32(&mut self) -> Result<u32, PersistenceError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn f32(&mut self) -> Result<f32, PersistenceError> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn string(&mut self) -> Result<String, PersistenceError> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| corrupt(self.path, e.to_string()))
    }

    fn is_done(&self) -> bool {
        self.pos == self.buf.len()
    }
}

/// Read and verify a snapshot written for `expected_dimensions`. Returns
/// `Ok(None)` if the file does not exist.
pub fn read_snapshot(
    path: &Path,
    expected_dimensions: usize,
) -> Result<Option<Snapshot>, PersistenceError> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_err(path, e)),
    };
    if raw.len() < HEADER_LEN || &raw[0..4] != MAGIC {
        return Err(corrupt(path, "missing snapshot header"));
    }
    let version = u16::from_le_bytes([raw[4], raw[5]]);
    if version != FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            path: path.display().to_string(),
            version,
        });
    }
    let dimensions = u32::from_le_bytes([raw[6], raw[7], raw[8], raw[9]]) as usize;
    if dimensions != expected_dimensions {
        return Err(corrupt(
            path,
            format!(
                "snapshot has {dimensions} dimensions, partition expects {expected_dimensions}"
            ),
        ));
    }
    let mut count_bytes = [0u8; 8];
    count_bytes.copy_from_slice(&raw[10..PREFIX_LEN]);
    let count = u64::from_le_bytes(count_bytes);
    let expected = &raw[PREFIX_LEN..HEADER_LEN];

    let body = zstd::decode_all(&raw[HEADER_LEN..]).map_err(|e| corrupt(path, e.to_string()))?;
    if checksum(&raw[..PREFIX_LEN], &body).as_bytes().as_slice() != expected {
        return Err(corrupt(path, "checksum mismatch"));
    }

    let mut reader = Reader {
        buf: &body,
        pos: 0,
        path,
    };
    let mut entries = Vec::new();
    for _ in 0..count {
        let document_id = reader.string()?;
        let partition_id = reader.string()?;
        let n = reader.u32()? as usize;
        let mut entry = VectorEntry::new(document_id, partition_id, Vec::new());
        for _ in 0..n {
            let key = reader.string()?;
            let value = reader.string()?;
            entry.metadata.insert(key, value);
        }
        for _ in 0..dimensions {
            entry.vector.push(reader.f32()?);
        }
        entries.push(entry);
    }
    if !reader.is_done() {
        return Err(corrupt(path, "trailing bytes after last entry"));
    }

    Ok(Some(Snapshot {
        dimensions,
        entries,
    }))
}
