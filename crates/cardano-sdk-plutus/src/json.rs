//! Detailed-schema JSON for Plutus Data.
//!
//! ```text
//! {"constructor": 0, "fields": [...]}
//! {"map": [{"k": ..., "v": ...}]}
//! {"list": [...]}
//! {"int": 42}
//! {"bytes": "deadbeef"}
//! ```
//!
//! Integers of any size are written as JSON numbers.

use serde_json::{json, Value};

use cardano_sdk_core::json::{
    array_field, expect_object, integer_from_json, integer_to_json, invalid, parse_json,
};
use cardano_sdk_core::{Buffer, Result};

use crate::constr::ConstrPlutusData;
use crate::list::PlutusList;
use crate::map::PlutusMap;
use crate::plutus_data::{PlutusData, PlutusDataValue};

impl PlutusData {
    /// Render as detailed-schema JSON.
    pub fn to_json(&self) -> Value {
        match self.as_value() {
            PlutusDataValue::Constr(constr) => {
                let fields: Vec<Value> =
                    constr.fields().to_vec().iter().map(Self::to_json).collect();
                json!({ "constructor": constr.alternative(), "fields": fields })
            }
            PlutusDataValue::Map(map) => {
                let entries: Vec<Value> = map
                    .to_vec()
                    .into_iter()
                    .map(|(k, v)| json!({ "k": k.to_json(), "v": v.to_json() }))
                    .collect();
                json!({ "map": entries })
            }
            PlutusDataValue::List(list) => {
                let items: Vec<Value> = list.to_vec().iter().map(Self::to_json).collect();
                json!({ "list": items })
            }
            PlutusDataValue::Integer(n) => json!({ "int": integer_to_json(n) }),
            PlutusDataValue::Bytes(bytes) => json!({ "bytes": bytes.to_hex() }),
        }
    }

    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    /// Build a value from detailed-schema JSON.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = expect_object(value)?;

        if let Some(alternative) = object.get("constructor") {
            let alternative = alternative
                .as_u64()
                .ok_or_else(|| invalid("\"constructor\" must be a non-negative integer"))?;
            let fields = array_field(object, "fields")?
                .iter()
                .map(Self::from_json)
                .collect::<Result<PlutusList>>()?;
            return Ok(Self::new_constr(ConstrPlutusData::new(alternative, fields)));
        }

        if object.contains_key("map") {
            let map = PlutusMap::new();
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
                .collect::<Result<PlutusList>>()?;
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

        Err(invalid(format!("unrecognized plutus data JSON: {}", value)))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Self::from_json(&parse_json(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardano_sdk_core::{FromCbor, ToCbor};

    #[test]
    fn test_schema_shape() {
        let data = PlutusData::from_cbor_hex("d8799f0a4201029f03ffa10405ff").unwrap();
        let expected = json!({
            "constructor": 0,
            "fields": [
                {"int": 10},
                {"bytes": "0102"},
                {"list": [{"int": 3}]},
                {"map": [{"k": {"int": 4}, "v": {"int": 5}}]}
            ]
        });
        assert_eq!(data.to_json(), expected);
        assert_eq!(PlutusData::from_json(&expected).unwrap(), data);
    }

    #[test]
    fn test_big_integers_survive() {
        let text = "-340282366920938463463374607431768211457";
        let data = PlutusData::new_integer_from_str(text, 10).unwrap();
        let rendered = data.to_json_string();
        assert_eq!(rendered, format!("{{\"int\":{}}}", text));

        let back = PlutusData::from_json_str(&rendered).unwrap();
        assert_eq!(back, data);
        assert_eq!(back.to_cbor_bytes().unwrap(), data.to_cbor_bytes().unwrap());
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "[]",
            "{}",
            r#"{"int": "12"}"#,
            r#"{"int": 1.5}"#,
            r#"{"bytes": "zz"}"#,
            r#"{"constructor": -1, "fields": []}"#,
            r#"{"map": [{"k": {"int": 1}}]}"#,
            "not json",
        ] {
            assert!(PlutusData::from_json_str(bad).is_err(), "{} accepted", bad);
        }
    }
}
