//! Ordered key/value pairs of Plutus Data.

use std::cell::RefCell;
use std::fmt;

use cardano_sdk_core::{
    Buffer, CborReader, CborReaderState, CborWriter, CodecError, EncodedCache, FromCbor, Object,
    Result, Shared, ToCbor,
};

use crate::list::PlutusList;
use crate::plutus_data::PlutusData;

struct PlutusMapCell {
    entries: RefCell<Vec<(PlutusData, PlutusData)>>,
    cache: RefCell<Option<Buffer>>,
}

/// A shared map from [`PlutusData`] keys to values.
///
/// Entries keep insertion order and keys are not required to be unique.
/// Always encoded as a definite-length map.
#[derive(Clone)]
pub struct PlutusMap {
    inner: Object<PlutusMapCell>,
}

impl PlutusMap {
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), None)
    }

    fn from_parts(entries: Vec<(PlutusData, PlutusData)>, cache: Option<Buffer>) -> Self {
        Self {
            inner: Object::new(PlutusMapCell {
                entries: RefCell::new(entries),
                cache: RefCell::new(cache),
            }),
        }
    }

    /// Append a pair. Existing pairs with an equal key are kept.
    pub fn insert(&self, key: PlutusData, value: PlutusData) {
        self.inner.entries.borrow_mut().push((key, value));
        self.inner.cache.replace(None);
    }

    /// The value of the first pair whose key equals `key`.
    pub fn get(&self, key: &PlutusData) -> Option<PlutusData> {
        self.inner
            .entries
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn get_key_value_at(&self, index: usize) -> Result<(PlutusData, PlutusData)> {
        let entries = self.inner.entries.borrow();
        entries.get(index).cloned().ok_or(CodecError::IndexOutOfBounds {
            index,
            len: entries.len(),
        })
    }

    pub fn get_key_at(&self, index: usize) -> Result<PlutusData> {
        Ok(self.get_key_value_at(index)?.0)
    }

    pub fn get_value_at(&self, index: usize) -> Result<PlutusData> {
        Ok(self.get_key_value_at(index)?.1)
    }

    pub fn keys(&self) -> PlutusList {
        self.inner.entries.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> PlutusList {
        self.inner.entries.borrow().iter().map(|(_, v)| v.clone()).collect()
    }

    /// Handles to every pair, in order.
    pub fn to_vec(&self) -> Vec<(PlutusData, PlutusData)> {
        self.inner.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    pub fn ptr_eq(&self, other: &PlutusMap) -> bool {
        Object::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for PlutusMap {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(PlutusData, PlutusData)> for PlutusMap {
    fn from_iter<I: IntoIterator<Item = (PlutusData, PlutusData)>>(iter: I) -> Self {
        Self::from_parts(iter.into_iter().collect(), None)
    }
}

impl FromCbor for PlutusMap {
    fn from_cbor(reader: &mut CborReader) -> Result<Self> {
        let raw = reader.clone().read_encoded_value()?;

        let entries = match reader.read_start_map()? {
            Some(len) => {
                let mut entries = Vec::with_capacity(reader.bounded_capacity(len));
                for _ in 0..len {
                    let key = PlutusData::from_cbor(reader)?;
                    let value = PlutusData::from_cbor(reader)?;
                    entries.push((key, value));
                }
                entries
            }
            None => {
                let mut entries = Vec::new();
                while reader.peek_state()? != CborReaderState::Break {
                    let key = PlutusData::from_cbor(reader)?;
                    let value = PlutusData::from_cbor(reader)?;
                    entries.push((key, value));
                }
                reader.read_end_map()?;
                entries
            }
        };

        Ok(Self::from_parts(entries, Some(raw)))
    }
}

impl ToCbor for PlutusMap {
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

impl EncodedCache for PlutusMap {
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

impl Shared for PlutusMap {
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

/// Maps are equal when their pairs can be matched one to one. Order is
/// ignored, repeated pairs must repeat the same number of times.
impl PartialEq for PlutusMap {
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

impl fmt::Debug for PlutusMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.inner.entries.borrow().iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: u64) -> PlutusData {
        PlutusData::from(v)
    }

    #[test]
    fn test_encodes_definite() {
        let map = PlutusMap::new();
        map.insert(int(0), int(1));
        map.insert(int(1), PlutusData::new_bytes(vec![0xaa, 0xbb]));
        assert_eq!(map.to_cbor_hex().unwrap(), "a200010142aabb");
        assert_eq!(PlutusMap::new().to_cbor_hex().unwrap(), "a0");
    }

    #[test]
    fn test_decode_indefinite() {
        let map = PlutusMap::from_cbor_hex("bf0102ff").unwrap();
        assert_eq!(map.get(&int(1)), Some(int(2)));
        assert_eq!(map.to_cbor_hex().unwrap(), "bf0102ff");

        map.clear_encoded_cache();
        assert_eq!(map.to_cbor_hex().unwrap(), "a10102");
    }

    #[test]
    fn test_duplicate_keys_kept_in_order() {
        let map = PlutusMap::new();
        map.insert(int(1), int(10));
        map.insert(int(1), int(20));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&int(1)), Some(int(10)));
        assert_eq!(map.get_value_at(1).unwrap(), int(20));
        assert_eq!(map.get(&int(2)), None);
    }

    #[test]
    fn test_index_accessors() {
        let map: PlutusMap = vec![(int(5), int(6))].into_iter().collect();
        assert_eq!(map.get_key_at(0).unwrap(), int(5));
        assert_eq!(map.get_key_value_at(0).unwrap(), (int(5), int(6)));
        assert_eq!(
            map.get_key_at(3).unwrap_err(),
            CodecError::IndexOutOfBounds { index: 3, len: 1 }
        );
    }

    #[test]
    fn test_keys_and_values() {
        let map: PlutusMap = vec![(int(1), int(2)), (int(3), int(4))].into_iter().collect();
        assert_eq!(map.keys(), PlutusList::from(vec![int(1), int(3)]));
        assert_eq!(map.values(), PlutusList::from(vec![int(2), int(4)]));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: PlutusMap = vec![(int(1), int(2)), (int(3), int(4))].into_iter().collect();
        let b: PlutusMap = vec![(int(3), int(4)), (int(1), int(2))].into_iter().collect();
        let c: PlutusMap = vec![(int(1), int(2))].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_equality_counts_repeated_pairs() {
        let a: PlutusMap = vec![(int(1), int(2)), (int(1), int(2)), (int(3), int(4))]
            .into_iter()
            .collect();
        let b: PlutusMap = vec![(int(1), int(2)), (int(3), int(4)), (int(3), int(4))]
            .into_iter()
            .collect();
        assert_ne!(a.to_cbor_hex().unwrap(), b.to_cbor_hex().unwrap());
        assert_ne!(a, b);
        assert_ne!(b, a);

        let shuffled: PlutusMap = vec![(int(3), int(4)), (int(1), int(2)), (int(1), int(2))]
            .into_iter()
            .collect();
        assert_eq!(a, shuffled);
    }

    #[test]
    fn test_insert_clears_own_cache() {
        let map = PlutusMap::from_cbor_hex("a10102").unwrap();
        map.insert(int(3), int(4));
        assert!(!map.has_encoded_cache());
        assert_eq!(map.to_cbor_hex().unwrap(), "a201020304");
    }

    #[test]
    fn test_odd_indefinite_map_fails() {
        assert!(PlutusMap::from_cbor_hex("bf01ff").is_err());
    }
}
