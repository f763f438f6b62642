//! Auxiliary-data metadata: a map from unsigned labels to metadatums.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;

use cardano_sdk_core::{
    Buffer, CborReader, CborReaderState, CborWriter, EncodedCache, FromCbor, Object, Result,
    Shared, ToCbor,
};

use crate::metadatum::Metadatum;

struct TransactionMetadataCell {
    entries: RefCell<Vec<(u64, Metadatum)>>,
    cache: RefCell<Option<Buffer>>,
}

/// Labelled metadatums attached to a transaction.
///
/// Labels are unique. Entries keep the order in which labels were first
/// inserted; the encoding is a definite-length map with unsigned keys.
#[derive(Clone)]
pub struct TransactionMetadata {
    inner: Object<TransactionMetadataCell>,
}

impl TransactionMetadata {
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), None)
    }

    fn from_parts(entries: Vec<(u64, Metadatum)>, cache: Option<Buffer>) -> Self {
        Self {
            inner: Object::new(TransactionMetadataCell {
                entries: RefCell::new(entries),
                cache: RefCell::new(cache),
            }),
        }
    }

    /// Set the metadatum for `label`, returning the one it replaced.
    pub fn insert(&self, label: u64, value: Metadatum) -> Option<Metadatum> {
        let mut entries = self.inner.entries.borrow_mut();
        self.inner.cache.replace(None);

        match entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                entries.push((label, value));
                None
            }
        }
    }

    pub fn get(&self, label: u64) -> Option<Metadatum> {
        self.inner
            .entries
            .borrow()
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.clone())
    }

    pub fn labels(&self) -> Vec<u64> {
        self.inner.entries.borrow().iter().map(|(l, _)| *l).collect()
    }

    pub fn to_vec(&self) -> Vec<(u64, Metadatum)> {
        self.inner.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    pub fn ptr_eq(&self, other: &TransactionMetadata) -> bool {
        Object::ptr_eq(&self.inner, &other.inner)
    }

    fn read_entry(
        reader: &mut CborReader,
        seen: &mut HashSet<u64>,
        entries: &mut Vec<(u64, Metadatum)>,
    ) -> Result<()> {
        let label = reader.read_uint()?;
        if !seen.insert(label) {
            return Err(reader.fail(format!("duplicate metadata label {}", label)));
        }
        entries.push((label, Metadatum::from_cbor(reader)?));
        Ok(())
    }
}

impl Default for TransactionMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(u64, Metadatum)> for TransactionMetadata {
    /// Later duplicates of a label replace earlier ones.
    fn from_iter<I: IntoIterator<Item = (u64, Metadatum)>>(iter: I) -> Self {
        let metadata = Self::new();
        for (label, value) in iter {
            metadata.insert(label, value);
        }
        metadata
    }
}

impl FromCbor for TransactionMetadata {
    fn from_cbor(reader: &mut CborReader) -> Result<Self> {
        let raw = reader.clone().read_encoded_value()?;

        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        match reader.read_start_map()? {
            Some(len) => {
                let capacity = reader.bounded_capacity(len);
                entries.reserve(capacity);
                seen.reserve(capacity);
                for _ in 0..len {
                    Self::read_entry(reader, &mut seen, &mut entries)?;
                }
            }
            None => {
                while reader.peek_state()? != CborReaderState::Break {
                    Self::read_entry(reader, &mut seen, &mut entries)?;
                }
                reader.read_end_map()?;
            }
        }

        tracing::debug!(labels = entries.len(), "decoded transaction metadata");
        Ok(Self::from_parts(entries, Some(raw)))
    }
}

impl ToCbor for TransactionMetadata {
    fn to_cbor(&self, writer: &mut CborWriter) -> Result<()> {
        if let Some(raw) = self.inner.cache.borrow().as_ref() {
            writer.write_encoded(raw.as_slice());
            return Ok(());
        }

        let entries = self.inner.entries.borrow();
        writer.write_start_map(Some(entries.len() as u64));
        for (label, value) in entries.iter() {
            writer.write_uint(*label);
            value.to_cbor(writer)?;
        }
        Ok(())
    }
}

impl EncodedCache for TransactionMetadata {
    fn clear_encoded_cache(&self) {
        self.inner.cache.replace(None);
        for (_, value) in self.inner.entries.borrow().iter() {
            value.clear_encoded_cache();
        }
    }

    fn encoded_cache(&self) -> Option<Buffer> {
        self.inner.cache.borrow().clone()
    }
}

impl Shared for TransactionMetadata {
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

/// Equal when both hold the same labels with equal metadatums.
impl PartialEq for TransactionMetadata {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.len() == other.len()
            && self
                .inner
                .entries
                .borrow()
                .iter()
                .all(|(label, value)| other.get(*label).as_ref() == Some(value))
    }
}

impl fmt::Debug for TransactionMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.inner.entries.borrow().iter().map(|(l, v)| (l, v)))
            .finish()
    }
}
