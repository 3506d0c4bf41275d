use crate::artifacts::core::codec;
use crate::artifacts::database::object_store::{ObjectStore, RawObject};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::error::{Error, Result};
use bytes::Bytes;
use std::cell::RefCell;
use std::collections::HashMap;

/// Object store holding compressed objects in memory
///
/// Stores the same compressed bytes the filesystem database would write,
/// so reads exercise the full decode path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RefCell<HashMap<ObjectId, Bytes>>,
}

impl MemoryStore {
    pub fn object_count(&self) -> usize {
        self.objects.borrow().len()
    }

    /// Replace the stored bytes of an object, bypassing encoding
    pub fn insert_raw(&self, oid: ObjectId, compressed: impl Into<Bytes>) {
        self.objects.borrow_mut().insert(oid, compressed.into());
    }
}

impl ObjectStore for MemoryStore {
    fn write(&self, kind: ObjectType, payload: &[u8]) -> Result<ObjectId> {
        let oid = codec::digest_of(kind, payload);

        if !self.exists(&oid) {
            let compressed = codec::compress(&codec::encode(kind, payload))?;
            self.objects.borrow_mut().insert(oid, compressed);
        }

        Ok(oid)
    }

    fn read(&self, oid: &ObjectId) -> Result<RawObject> {
        let compressed = self
            .objects
            .borrow()
            .get(oid)
            .cloned()
            .ok_or_else(|| Error::ObjectNotFound(oid.to_string()))?;

        let data = codec::decompress(&compressed)?;
        let (kind, payload) = ObjectType::split_header(&data)?;

        Ok(RawObject::new(kind, data.slice_ref(payload)))
    }

    fn exists(&self, oid: &ObjectId) -> bool {
        self.objects.borrow().contains_key(oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(ObjectType::Blob)]
    #[case(ObjectType::Tree)]
    #[case(ObjectType::Commit)]
    #[case(ObjectType::Tag)]
    fn writing_twice_keeps_one_copy(#[case] kind: ObjectType) {
        let store = MemoryStore::default();

        let first = store.write(kind, b"payload").unwrap();
        let second = store.write(kind, b"payload").unwrap();

        assert_eq!(first, second);
        assert_eq!(store.object_count(), 1);
    }

    #[test]
    fn missing_object_is_not_found() {
        let store = MemoryStore::default();
        let oid = codec::digest_of(ObjectType::Blob, b"absent");

        assert!(matches!(store.read(&oid), Err(Error::ObjectNotFound(_))));
    }

    #[test]
    fn mislabeled_size_is_corrupt() {
        let store = MemoryStore::default();
        let oid = codec::digest_of(ObjectType::Blob, b"hello\n");
        store.insert_raw(oid, codec::compress(b"blob 9\0hello\n").unwrap());

        assert!(matches!(store.read(&oid), Err(Error::CorruptObject(_))));
    }

    proptest! {
        #[test]
        fn read_returns_what_was_written(payload in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let store = MemoryStore::default();
            let oid = store.write(ObjectType::Blob, &payload).unwrap();

            prop_assert_eq!(
                store.read(&oid).unwrap(),
                RawObject::new(ObjectType::Blob, Bytes::from(payload))
            );
        }
    }
}
