//! Ordered sequence of metadatums.

use std::cell::RefCell;
use std::fmt;

use cardano_sdk_core::{
    Buffer, CborReader, CborReaderState, CborWriter, CodecError, EncodedCache, FromCbor, Object,
    Result, Shared, ToCbor,
};

use crate::metadatum::Metadatum;

struct MetadatumListCell {
    items: RefCell<Vec<Metadatum>>,
    cache: RefCell<Option<Buffer>>,
}

/// A shared, growable list of [`Metadatum`]. Always encoded with a definite
/// length.
#[derive(Clone)]
pub struct MetadatumList {
    inner: Object<MetadatumListCell>,
}

impl MetadatumList {
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), None)
    }

    fn from_parts(items: Vec<Metadatum>, cache: Option<Buffer>) -> Self {
        Self {
            inner: Object::new(MetadatumListCell {
                items: RefCell::new(items),
                cache: RefCell::new(cache),
            }),
        }
    }

    /// Append an element. Clears this list's cached encoding.
    pub fn add(&self, item: Metadatum) {
        self.inner.items.borrow_mut().push(item);
        self.inner.cache.replace(None);
    }

    pub fn get(&self, index: usize) -> Result<Metadatum> {
        let items = self.inner.items.borrow();
        items.get(index).cloned().ok_or(CodecError::IndexOutOfBounds {
            index,
            len: items.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    pub fn to_vec(&self) -> Vec<Metadatum> {
        self.inner.items.borrow().clone()
    }

    pub fn concat(&self, other: &MetadatumList) -> MetadatumList {
        let mut items = self.to_vec();
        items.extend(other.to_vec());
        Self::from_parts(items, None)
    }

    pub fn ptr_eq(&self, other: &MetadatumList) -> bool {
        Object::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for MetadatumList {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Metadatum>> for MetadatumList {
    fn from(items: Vec<Metadatum>) -> Self {
        Self::from_parts(items, None)
    }
}

impl FromIterator<Metadatum> for MetadatumList {
    fn from_iter<I: IntoIterator<Item = Metadatum>>(iter: I) -> Self {
        Self::from_parts(iter.into_iter().collect(), None)
    }
}

impl FromCbor for MetadatumList {
    fn from_cbor(reader: &mut CborReader) -> Result<Self> {
        let raw = reader.clone().read_encoded_value()?;

        let items = match reader.read_start_array()? {
            Some(len) => {
                let mut items = Vec::with_capacity(reader.bounded_capacity(len));
                for _ in 0..len {
                    items.push(Metadatum::from_cbor(reader)?);
                }
                items
            }
            None => {
                let mut items = Vec::new();
                while reader.peek_state()? != CborReaderState::Break {
                    items.push(Metadatum::from_cbor(reader)?);
                }
                reader.read_end_array()?;
                items
            }
        };

        Ok(Self::from_parts(items, Some(raw)))
    }
}

impl ToCbor for MetadatumList {
    fn to_cbor(&self, writer: &mut CborWriter) -> Result<()> {
        if let Some(raw) = self.inner.cache.borrow().as_ref() {
            writer.write_encoded(raw.as_slice());
            return Ok(());
        }

        let items = self.inner.items.borrow();
        writer.write_start_array(Some(items.len() as u64));
        for item in items.iter() {
            item.to_cbor(writer)?;
        }
        Ok(())
    }
}

impl EncodedCache for MetadatumList {
    fn clear_encoded_cache(&self) {
        self.inner.cache.replace(None);
        for item in self.inner.items.borrow().iter() {
            item.clear_encoded_cache();
        }
    }

    fn encoded_cache(&self) -> Option<Buffer> {
        self.inner.cache.borrow().clone()
    }
}

impl Shared for MetadatumList {
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

impl PartialEq for MetadatumList {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.inner.items.borrow() == *other.inner.items.borrow()
    }
}

impl fmt::Debug for MetadatumList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.items.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definite_encoding() {
        let list: MetadatumList = vec![Metadatum::from(1u64), Metadatum::from("a")].into();
        assert_eq!(list.to_cbor_hex().unwrap(), "82016161");
        assert_eq!(MetadatumList::new().to_cbor_hex().unwrap(), "80");
    }

    #[test]
    fn test_indefinite_input_replayed_then_normalized() {
        let list = MetadatumList::from_cbor_hex("9f0102ff").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.to_cbor_hex().unwrap(), "9f0102ff");

        list.clear_encoded_cache();
        assert_eq!(list.to_cbor_hex().unwrap(), "820102");
    }

    #[test]
    fn test_get_and_add() {
        let list = MetadatumList::from_cbor_hex("8101").unwrap();
        list.add(Metadatum::from("z"));
        assert_eq!(list.get(1).unwrap().to_text().unwrap(), "z");
        assert_eq!(
            list.get(2).unwrap_err(),
            CodecError::IndexOutOfBounds { index: 2, len: 2 }
        );
        assert_eq!(list.to_cbor_hex().unwrap(), "8201617a");
    }

    #[test]
    fn test_concat() {
        let a: MetadatumList = vec![Metadatum::from(1u64)].into();
        let b: MetadatumList = vec![Metadatum::from(2u64)].into();
        assert_eq!(a.concat(&b).to_cbor_hex().unwrap(), "820102");
    }
}
