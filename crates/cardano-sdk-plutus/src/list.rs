//! Ordered sequence of Plutus Data.

use std::cell::RefCell;
use std::fmt;

use cardano_sdk_core::{
    Buffer, CborReader, CborReaderState, CborWriter, CodecError, EncodedCache, FromCbor, Object,
    Result, Shared, ToCbor,
};

use crate::plutus_data::PlutusData;

struct PlutusListCell {
    items: RefCell<Vec<PlutusData>>,
    cache: RefCell<Option<Buffer>>,
}

/// A shared, growable list of [`PlutusData`].
///
/// An empty list encodes as `0x80`. A non-empty list encodes as an
/// indefinite-length array closed by a break.
#[derive(Clone)]
pub struct PlutusList {
    inner: Object<PlutusListCell>,
}

impl PlutusList {
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), None)
    }

    fn from_parts(items: Vec<PlutusData>, cache: Option<Buffer>) -> Self {
        Self {
            inner: Object::new(PlutusListCell {
                items: RefCell::new(items),
                cache: RefCell::new(cache),
            }),
        }
    }

    /// Append an element. Clears this list's cached encoding.
    pub fn add(&self, item: PlutusData) {
        self.inner.items.borrow_mut().push(item);
        self.inner.cache.replace(None);
    }

    pub fn get(&self, index: usize) -> Result<PlutusData> {
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

    /// Handles to every element, in order.
    pub fn to_vec(&self) -> Vec<PlutusData> {
        self.inner.items.borrow().clone()
    }

    /// A new list holding the elements of `self` followed by those of
    /// `other`. Elements are shared, not copied.
    pub fn concat(&self, other: &PlutusList) -> PlutusList {
        let mut items = self.to_vec();
        items.extend(other.to_vec());
        Self::from_parts(items, None)
    }

    pub fn ptr_eq(&self, other: &PlutusList) -> bool {
        Object::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for PlutusList {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<PlutusData>> for PlutusList {
    fn from(items: Vec<PlutusData>) -> Self {
        Self::from_parts(items, None)
    }
}

impl FromIterator<PlutusData> for PlutusList {
    fn from_iter<I: IntoIterator<Item = PlutusData>>(iter: I) -> Self {
        Self::from_parts(iter.into_iter().collect(), None)
    }
}

impl FromCbor for PlutusList {
    fn from_cbor(reader: &mut CborReader) -> Result<Self> {
        let raw = reader.clone().read_encoded_value()?;

        let items = match reader.read_start_array()? {
            Some(len) => {
                let mut items = Vec::with_capacity(reader.bounded_capacity(len));
                for _ in 0..len {
                    items.push(PlutusData::from_cbor(reader)?);
                }
                items
            }
            None => {
                let mut items = Vec::new();
                while reader.peek_state()? != CborReaderState::Break {
                    items.push(PlutusData::from_cbor(reader)?);
                }
                reader.read_end_array()?;
                items
            }
        };

        Ok(Self::from_parts(items, Some(raw)))
    }
}

impl ToCbor for PlutusList {
    fn to_cbor(&self, writer: &mut CborWriter) -> Result<()> {
        if let Some(raw) = self.inner.cache.borrow().as_ref() {
            writer.write_encoded(raw.as_slice());
            return Ok(());
        }

        let items = self.inner.items.borrow();
        if items.is_empty() {
            writer.write_start_array(Some(0));
            return Ok(());
        }

        writer.write_start_array(None);
        for item in items.iter() {
            item.to_cbor(writer)?;
        }
        writer.write_end_array();
        Ok(())
    }
}

impl EncodedCache for PlutusList {
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

impl Shared for PlutusList {
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

impl PartialEq for PlutusList {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.inner.items.borrow() == *other.inner.items.borrow()
    }
}

impl fmt::Debug for PlutusList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.items.borrow().iter()).finish()
    }
}
