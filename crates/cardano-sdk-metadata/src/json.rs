//! Detailed-schema JSON for metadatums.
//!
//! Same shape as the Plutus schema, with `{"string": "..."}` for text and
//! no constructors. [`TransactionMetadata`] renders as an object keyed by
//! decimal label.

use serde_json::{json, Map, Value};

use cardano_sdk_core::json::{
    array_field, expect_object, integer_from_json, integer_to_json, invalid, parse_json,
};
use cardano_sdk_core::{Buffer, Result};

use crate::list::MetadatumList;
use crate::map::MetadatumMap;
use crate::metadatum::{Metadatum, MetadatumValue};
use crate::transaction_metadata::TransactionMetadata;

impl Metadatum {
    /// Render as detailed-schema JSON.
    pub fn to_json(&self) -> Value {
        match self.as_value() {
            MetadatumValue::Map(map) => {
                let entries: Vec<Value> = map
                    .to_vec()
                    .into_iter()
                    .map(|(k, v)| json!({ "k": k.to_json(), "v": v.to_json() }))
                    .collect();
                json!({ "map": entries })
            }
            MetadatumValue::List(list) => {
                let items: Vec<Value> = list.to_vec().iter().map(Self::to_json).collect();
                json!({ "list": items })
            }
            MetadatumValue::Integer(n) => json!({ "int": integer_to_json(n) }),
            MetadatumValue::Bytes(bytes) => json!({ "bytes": bytes.to_hex() }),
            MetadatumValue::Text(text) => json!({ "string": text }),
        }
    }

    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        let object = expect_object(value)?;

        if object.contains_key("map") {
            let map = MetadatumMap::new();
            for entry in array_field(object, "map")? {
                let entry = expect_object(entry)?;
                let (Some(k), Some(v)) = (entry.get("k"), entry.get("v")) else {
                    return Err(invalid("map entries need \"k\" and \"v\""));
                };
                map.insert(Self::from_json(k)?, Self::from_json(v)?);
            }
            return Ok(Self::new_map(map));
        }

        if object.contains_key("list") {
            let list = array_field(object, "list")?
                .iter()
                .map(Self::from_json)
                .collect::<Result<MetadatumList>>()?;
            return Ok(Self::new_list(list));
        }

        if let Some(n) = object.get("int") {
            return Ok(Self::new_integer(integer_from_json(n)?));
        }

        if let Some(bytes) = object.get("bytes") {
            let hex = bytes
                .as_str()
                .ok_or_else(|| invalid("\"bytes\" must be a hex string"))?;
            return Ok(Self::new_bytes(Buffer::from_hex(hex)?));
        }

        if let Some(text) = object.get("string") {
            let text = text
                .as_str()
                .ok_or_else(|| invalid("\"string\" must be a JSON string"))?;
            return Ok(Self::new_string(text));
        }

        Err(invalid(format!("unrecognized metadatum JSON: {}", value)))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Self::from_json(&parse_json(s)?)
    }
}

impl TransactionMetadata {
    /// Render as `{"<label>": <metadatum>, ...}`.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for (label, value) in self.to_vec() {
            object.insert(label.to_string(), value.to_json());
        }
        Value::Object(object)
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        let metadata = TransactionMetadata::new();
        for (label, datum) in expect_object(value)? {
            let label = label
                .parse::<u64>()
                .map_err(|_| invalid(format!("metadata label {:?} is not a u64", label)))?;
            metadata.insert(label, Metadatum::from_json(datum)?);
        }
        Ok(metadata)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Self::from_json(&parse_json(s)?)
    }
}
