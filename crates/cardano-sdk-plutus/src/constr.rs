//! Constructor applications: an alternative index plus a field list.
//!
//! The alternative selects the CBOR tag:
//!
//! | alternative | encoding                      |
//! |-------------|-------------------------------|
//! | 0 to 6      | tag `121 + a`, fields         |
//! | 7 to 127    | tag `1280 + (a - 7)`, fields  |
//! | otherwise   | tag `102`, `[a, fields]`      |

use std::cell::{Cell, RefCell};
use std::fmt;

use cardano_sdk_core::{
    Buffer, CborReader, CborWriter, EncodedCache, FromCbor, Object, Result, Shared, ToCbor,
};

use crate::list::PlutusList;

/// Tag wrapping `[alternative, fields]` for any alternative.
pub const GENERAL_FORM_TAG: u64 = 102;

/// Tag of alternative 0 in the compact range.
pub const COMPACT_TAG_BASE: u64 = 121;

/// Tag of alternative 7 in the extended range.
pub const EXTENDED_TAG_BASE: u64 = 1280;

const COMPACT_MAX_ALTERNATIVE: u64 = 6;
const EXTENDED_MAX_ALTERNATIVE: u64 = 127;

/// Last tag accepted in the extended range on decode.
const EXTENDED_TAG_LAST: u64 = 1400;

/// Map a constructor tag to its alternative, if the tag is one of the
/// compact or extended constructor tags.
pub fn alternative_from_tag(tag: u64) -> Option<u64> {
    match tag {
        t if (COMPACT_TAG_BASE..=COMPACT_TAG_BASE + COMPACT_MAX_ALTERNATIVE).contains(&t) => {
            Some(t - COMPACT_TAG_BASE)
        }
        t if (EXTENDED_TAG_BASE..=EXTENDED_TAG_LAST).contains(&t) => {
            Some(t - EXTENDED_TAG_BASE + COMPACT_MAX_ALTERNATIVE + 1)
        }
        _ => None,
    }
}

/// The compact tag for an alternative, or `None` if it needs the general
/// form.
pub fn tag_for_alternative(alternative: u64) -> Option<u64> {
    match alternative {
        a if a <= COMPACT_MAX_ALTERNATIVE => Some(COMPACT_TAG_BASE + a),
        a if a <= EXTENDED_MAX_ALTERNATIVE => {
            Some(EXTENDED_TAG_BASE + a - (COMPACT_MAX_ALTERNATIVE + 1))
        }
        _ => None,
    }
}

struct ConstrCell {
    alternative: Cell<u64>,
    fields: RefCell<PlutusList>,
    cache: RefCell<Option<Buffer>>,
}

/// A shared constructor application.
#[derive(Clone)]
pub struct ConstrPlutusData {
    inner: Object<ConstrCell>,
}

impl ConstrPlutusData {
    pub fn new(alternative: u64, fields: PlutusList) -> Self {
        Self::from_parts(alternative, fields, None)
    }

    fn from_parts(alternative: u64, fields: PlutusList, cache: Option<Buffer>) -> Self {
        Self {
            inner: Object::new(ConstrCell {
                alternative: Cell::new(alternative),
                fields: RefCell::new(fields),
                cache: RefCell::new(cache),
            }),
        }
    }

    pub fn alternative(&self) -> u64 {
        self.inner.alternative.get()
    }

    pub fn set_alternative(&self, alternative: u64) {
        self.inner.alternative.set(alternative);
        self.inner.cache.replace(None);
    }

    /// A handle to the field list. Changes made through it are visible here.
    pub fn fields(&self) -> PlutusList {
        self.inner.fields.borrow().clone()
    }

    pub fn set_fields(&self, fields: PlutusList) {
        self.inner.fields.replace(fields);
        self.inner.cache.replace(None);
    }

    pub fn ptr_eq(&self, other: &ConstrPlutusData) -> bool {
        Object::ptr_eq(&self.inner, &other.inner)
    }
}

impl FromCbor for ConstrPlutusData {
    fn from_cbor(reader: &mut CborReader) -> Result<Self> {
        let raw = reader.clone().read_encoded_value()?;
        let tag = reader.read_tag()?;

        let (alternative, fields) = if let Some(alternative) = alternative_from_tag(tag) {
            (alternative, PlutusList::from_cbor(reader)?)
        } else if tag == GENERAL_FORM_TAG {
            let len = reader.read_start_array()?;
            if !matches!(len, None | Some(2)) {
                return Err(reader.fail(format!(
                    "constructor in general form needs 2 elements, found {:?}",
                    len
                )));
            }
            let alternative = reader.read_uint()?;
            let fields = PlutusList::from_cbor(reader)?;
            if len.is_none() {
                reader.read_end_array()?;
            }
            (alternative, fields)
        } else {
            return Err(reader.fail(format!("unrecognized tag {} for plutus data", tag)));
        };

        tracing::trace!(alternative, fields = fields.len(), "decoded constructor");
        Ok(Self::from_parts(alternative, fields, Some(raw)))
    }
}

impl ToCbor for ConstrPlutusData {
    fn to_cbor(&self, writer: &mut CborWriter) -> Result<()> {
        if let Some(raw) = self.inner.cache.borrow().as_ref() {
            writer.write_encoded(raw.as_slice());
            return Ok(());
        }

        let alternative = self.alternative();
        let fields = self.inner.fields.borrow();
        match tag_for_alternative(alternative) {
            Some(tag) => {
                writer.write_tag(tag);
                fields.to_cbor(writer)
            }
            None => {
                writer.write_tag(GENERAL_FORM_TAG);
                writer.write_start_array(Some(2));
                writer.write_uint(alternative);
                fields.to_cbor(writer)
            }
        }
    }
}

impl EncodedCache for ConstrPlutusData {
    fn clear_encoded_cache(&self) {
        self.inner.cache.replace(None);
        self.inner.fields.borrow().clear_encoded_cache();
    }

    fn encoded_cache(&self) -> Option<Buffer> {
        self.inner.cache.borrow().clone()
    }
}

impl Shared for ConstrPlutusData {
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

impl PartialEq for ConstrPlutusData {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.alternative() == other.alternative()
                && *self.inner.fields.borrow() == *other.inner.fields.borrow())
    }
}

impl fmt::Debug for ConstrPlutusData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constr")
            .field("alternative", &self.alternative())
            .field("fields", &*self.inner.fields.borrow())
            .finish()
    }
}
