//! Loose-object store on the local filesystem.
//!
//! Objects live under `<root>/objects/<2 hex>/<62 hex>`, one file per object.
//! Each file holds a small text header followed by the raw object bytes:
//!
//! ```text
//! <kind> <size>\0<data>
//! ```
//!
//! Files are written to a temporary sibling and renamed into place, so a
//! reader never observes a partially written object. Every read re-hashes the
//! data and rejects files whose content no longer matches their name.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dlog_types::ContentRef;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::object::{ObjectKind, StoredObject};
use crate::traits::ObjectStore;

/// Filesystem-backed [`ObjectStore`].
#[derive(Clone, Debug)]
pub struct FsObjectStore {
    objects_dir: PathBuf,
}

impl FsObjectStore {
    /// Open (or create) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let objects_dir = root.as_ref().join("objects");
        fs::create_dir_all(&objects_dir)?;
        Ok(Self { objects_dir })
    }

    fn object_path(&self, id: &ContentRef) -> PathBuf {
        let hex = id.to_hex();
        let (fan, rest) = hex.split_at(2);
        self.objects_dir.join(fan).join(rest)
    }

    fn encode(object: &StoredObject) -> Vec<u8> {
        let mut bytes = format!("{} {}\0", object.kind, object.size).into_bytes();
        bytes.extend_from_slice(&object.data);
        bytes
    }

    fn decode(id: &ContentRef, bytes: &[u8]) -> StoreResult<StoredObject> {
        let corrupt = |reason: &str| StoreError::CorruptObject {
            id: *id,
            reason: reason.to_string(),
        };

        let nul = bytes
            .iter()
            .position(|b| *b == 0)
            .ok_or_else(|| corrupt("missing header terminator"))?;
        let header =
            std::str::from_utf8(&bytes[..nul]).map_err(|_| corrupt("header is not utf-8"))?;
        let (tag, size) = header
            .split_once(' ')
            .ok_or_else(|| corrupt("malformed header"))?;
        let kind = ObjectKind::from_tag(tag)
            .ok_or_else(|| corrupt(&format!("unknown object kind {tag:?}")))?;
        let size: u64 = size.parse().map_err(|_| corrupt("malformed size"))?;

        let data = bytes[nul + 1..].to_vec();
        if data.len() as u64 != size {
            return Err(corrupt(&format!(
                "size mismatch: header says {size}, found {}",
                data.len()
            )));
        }

        let object = StoredObject::new(kind, data);
        let computed = object.compute_id();
        if computed != *id {
            return Err(StoreError::HashMismatch { id: *id, computed });
        }
        Ok(object)
    }
}

impl ObjectStore for FsObjectStore {
    fn read(&self, id: &ContentRef) -> StoreResult<Option<StoredObject>> {
        let bytes = match fs::read(self.object_path(id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Self::decode(id, &bytes).map(Some).inspect_err(|e| {
            warn!(id = %id.short_hex(), error = %e, "corrupt object on disk");
        })
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ContentRef> {
        let id = object.compute_id();
        if id.is_null() {
            return Err(StoreError::NullContentRef);
        }

        let path = self.object_path(&id);
        if path.exists() {
            return Ok(id);
        }
        let dir = path
            .parent()
            .ok_or_else(|| StoreError::Unavailable(format!("bad object path {path:?}")))?;
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&Self::encode(object))?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        debug!(id = %id.short_hex(), kind = %object.kind, size = object.size, "object written");
        Ok(id)
    }

    fn exists(&self, id: &ContentRef) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(body: &str) -> StoredObject {
        StoredObject::new(ObjectKind::Article, body.as_bytes().to_vec())
    }

    fn open_temp() -> (tempfile::TempDir, FsObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn write_and_read_back() {
        let (_dir, store) = open_temp();
        let obj = StoredObject::new(ObjectKind::Segment, br#"{"items":[]}"#.to_vec());
        let id = store.write(&obj).unwrap();
        assert!(store.exists(&id).unwrap());
        assert_eq!(store.read(&id).unwrap(), Some(obj));
    }

    #[test]
    fn fan_out_layout() {
        let (_dir, store) = open_temp();
        let id = store.write(&article("layout")).unwrap();
        let hex = id.to_hex();
        let expected = store.objects_dir.join(&hex[..2]).join(&hex[2..]);
        assert!(expected.is_file());
    }

    #[test]
    fn missing_object_reads_as_none() {
        let (_dir, store) = open_temp();
        let id = ContentRef::from_bytes(b"nothing here");
        assert!(store.read(&id).unwrap().is_none());
        assert!(!store.exists(&id).unwrap());
    }

    #[test]
    fn write_is_idempotent() {
        let (_dir, store) = open_temp();
        let obj = article("twice");
        assert_eq!(store.write(&obj).unwrap(), store.write(&obj).unwrap());
    }

    #[test]
    fn reopen_sees_previous_objects() {
        let dir = tempfile::tempdir().unwrap();
        let obj = article("durable");
        let id = FsObjectStore::open(dir.path()).unwrap().write(&obj).unwrap();

        let reopened = FsObjectStore::open(dir.path()).unwrap();
        assert_eq!(reopened.read(&id).unwrap(), Some(obj));
    }

    #[test]
    fn tampered_file_is_rejected() {
        let (_dir, store) = open_temp();
        let id = store.write(&article("original")).unwrap();
        fs::write(store.object_path(&id), b"article 8\0tampered").unwrap();

        let err = store.read(&id).unwrap_err();
        assert!(matches!(err, StoreError::HashMismatch { .. }));
    }

    #[test]
    fn malformed_header_is_corrupt() {
        let (_dir, store) = open_temp();
        let id = ContentRef::from_bytes(b"garbage");
        let path = store.object_path(&id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();

        fs::write(&path, b"no terminator").unwrap();
        assert!(matches!(store.read(&id), Err(StoreError::CorruptObject { .. })));

        fs::write(&path, b"tree 3\0abc").unwrap();
        assert!(matches!(store.read(&id), Err(StoreError::CorruptObject { .. })));

        fs::write(&path, b"head 9\0abc").unwrap();
        assert!(matches!(store.read(&id), Err(StoreError::CorruptObject { .. })));
    }
}
