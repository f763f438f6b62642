//! Ordered key/value pairs of metadatums.

use std::cell::RefCell;
use std::fmt;

use cardano_sdk_core::{
    Buffer, CborReader, CborReaderState, CborWriter, CodecError, EncodedCache, FromCbor, Object,
    Result, Shared, ToCbor,
};

use crate::list::MetadatumList;
use crate::metadatum::Metadatum;

struct MetadatumMapCell {
    entries: RefCell<Vec<(Metadatum, Metadatum)>>,
    cache: RefCell<Option<Buffer>>,
}

/// A shared map from [`Metadatum`] keys to values.
///
/// Insertion order is kept and duplicate keys are allowed.
#[derive(Clone)]
pub struct MetadatumMap {
    inner: Object<MetadatumMapCell>,
}

impl MetadatumMap {
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), None)
    }

    fn from_parts(entries: Vec<(Metadatum, Metadatum)>, cache: Option<Buffer>) -> Self {
        Self {
            inner: Object::new(MetadatumMapCell {
                entries: RefCell::new(entries),
                cache: RefCell::new(cache),
            }),
        }
    }

    pub fn insert(&self, key: Metadatum, value: Metadatum) {
        self.inner.entries.borrow_mut().push((key, value));
        self.inner.cache.replace(None);
    }

    /// The value of the first pair whose key equals `key`.
    pub fn get(&self, key: &Metadatum) -> Option<Metadatum> {
        self.inner
            .entries
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn get_key_value_at(&self, index: usize) -> Result<(Metadatum, Metadatum)> {
        let entries = self.inner.entries.borrow();
        entries.get(index).cloned().ok_or(CodecError::IndexOutOfBounds {
            index,
            len: entries.len(),
        })
    }

    pub fn get_key_at(&self, index: usize) -> Result<Metadatum> {
        Ok(self.get_key_value_at(index)?.0)
    }

    pub fn get_value_at(&self, index: usize) -> Result<Metadatum> {
        Ok(self.get_key_value_at(index)?.1)
    }

    pub fn keys(&self) -> MetadatumList {
        self.inner.entries.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> MetadatumList {
        self.inner.entries.borrow().iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn to_vec(&self) -> Vec<(Metadatum, Metadatum)> {
        self.inner.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    pub fn ptr_eq(&self, other: &MetadatumMap) -> bool {
        Object::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for MetadatumMap {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(Metadatum, Metadatum)> for MetadatumMap {
    fn from_iter<I: IntoIterator<Item = (Metadatum, Metadatum)>>(iter: I) -> Self {
        Self::from_parts(iter.into_iter().collect(), None)
    }
}

impl FromCbor for MetadatumMap {
    fn from_cbor(reader: &mut CborReader) -> Result<Self> {
        let raw = reader.clone().read_encoded_value()?;

        let mut entries = Vec::new();
        match reader.read_start_map()? {
            Some(len) => {
                entries.reserve(reader.bounded_capacity(len));
                for _ in 0..len {
                    let key = Metadatum::from_cbor(reader)?;
                    entries.push((key, Metadatum::from_cbor(reader)?));
                }
            }
            None => {
                while reader.peek_state()? != CborReaderState::Break {
                    let key = Metadatum::from_cbor(reader)?;
                    entries.push((key, Metadatum::from_cbor(reader)?));
                }
                reader.read_end_map()?;
            }
        }

        Ok(Self::from_parts(entries, Some(raw)))
    }
}

impl ToCbor for MetadatumMap {
    fn to_cbor(&self, writer: &mut CborWriter) -> Result<()> {
        if let Some(raw) = self.inner.cache.borrow().as_ref() {
            writer.write_encoded(raw.as_slice());
            return Ok(());
        }

        let entries = self.inner.entries.borrow();
        writer.write_start_map(Some(entries.len() as u64));
        for (key, value) in entries.iter() {
            key.to_cbor(writer)?;
            value.to_cbor(writer)?;
        }
        Ok(())
    }
}

impl EncodedCache for MetadatumMap {
    fn clear_encoded_cache(&self) {
        self.inner.cache.replace(None);
        for (key, value) in self.inner.entries.borrow().iter() {
            key.clear_encoded_cache();
            value.clear_encoded_cache();
        }
    }

    fn encoded_cache(&self) -> Option<Buffer> {
        self.inner.cache.borrow().clone()
    }
}

impl Shared for MetadatumMap {
    fn refcount(&self) -> usize {
        self.inner.refcount()
    }

    fn set_last_error(&self, message: &str) {
        self.inner.set_last_error(message)
    }

    fn last_error(&self) -> String {
        self.inner.last_error()
    }
}

/// Order-insensitive, but each pair on one side consumes one equal pair on
/// the other, so repeats must match in number.
impl PartialEq for MetadatumMap {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.len() != other.len() {
            return false;
        }
        let ours = self.inner.entries.borrow();
        let theirs = other.inner.entries.borrow();
        let mut matched = vec![false; theirs.len()];
        ours.iter().all(|(k, v)| {
            let found = theirs
                .iter()
                .enumerate()
                .position(|(i, (tk, tv))| !matched[i] && tk == k && tv == v);
            match found {
                Some(i) => {
                    matched[i] = true;
                    true
                }
                None => false,
            }
        })
    }
}

impl fmt::Debug for MetadatumMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.inner.entries.borrow().iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_keys() {
        let map = MetadatumMap::new();
        map.insert(Metadatum::from("name"), Metadatum::from("ada"));
        map.insert(Metadatum::from("ticker"), Metadatum::from(1u64));

        assert_eq!(map.get(&Metadatum::from("name")).unwrap().to_text().unwrap(), "ada");
        assert!(map.get(&Metadatum::from("missing")).is_none());
        assert_eq!(
            map.to_cbor_hex().unwrap(),
            "a2646e616d6563616461667469636b657201"
        );
    }

    #[test]
    fn test_indefinite_input() {
        let map = MetadatumMap::from_cbor_hex("bf6161f5ff");
        assert!(map.is_err(), "booleans are not metadatums");

        let map = MetadatumMap::from_cbor_hex("bf616101ff").unwrap();
        assert_eq!(map.to_cbor_hex().unwrap(), "bf616101ff");
        map.clear_encoded_cache();
        assert_eq!(map.to_cbor_hex().unwrap(), "a1616101");
    }

    #[test]
    fn test_positional_access() {
        let map: MetadatumMap = vec![(Metadatum::from(1u64), Metadatum::from(2u64))]
            .into_iter()
            .collect();
        assert_eq!(map.get_key_at(0).unwrap(), Metadatum::from(1u64));
        assert_eq!(map.get_value_at(0).unwrap(), Metadatum::from(2u64));
        assert!(map.get_key_value_at(1).is_err());
        assert_eq!(map.keys().len(), 1);
        assert_eq!(map.values().get(0).unwrap(), Metadatum::from(2u64));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = MetadatumMap::from_cbor_hex("a201020304").unwrap();
        let b = MetadatumMap::from_cbor_hex("a203040102").unwrap();
        assert_eq!(a, b);
        assert_ne!(a.to_cbor_hex().unwrap(), b.to_cbor_hex().unwrap());
    }

    #[test]
    fn test_equality_counts_repeated_pairs() {
        let a = MetadatumMap::from_cbor_hex("a3010201020304").unwrap();
        let b = MetadatumMap::from_cbor_hex("a3010203040304").unwrap();
        assert_eq!(a.len(), b.len());
        assert_ne!(a, b);
        assert_ne!(b, a);

        let shuffled = MetadatumMap::from_cbor_hex("a3030401020102").unwrap();
        assert_eq!(a, shuffled);
    }
}
