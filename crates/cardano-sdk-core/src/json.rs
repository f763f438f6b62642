//! JSON building blocks shared by the detailed-schema renderers.
//!
//! Integers of any size travel as plain JSON numbers, so `serde_json` is
//! built with `arbitrary_precision`.

use num_bigint::BigInt;
use serde_json::{Map, Number, Value};

use crate::error::{CodecError, Result};

/// An [`CodecError::InvalidArgument`] carrying `message`.
pub fn invalid(message: impl Into<String>) -> CodecError {
    CodecError::InvalidArgument(message.into())
}

pub fn integer_to_json(n: &BigInt) -> Value {
    // Decimal digits are always a valid JSON number.
    serde_json::from_str::<Number>(&n.to_string()).map_or(Value::Null, Value::Number)
}

/// Read a JSON number as an integer. Fractions and exponents are rejected.
pub fn integer_from_json(value: &Value) -> Result<BigInt> {
    match value {
        Value::Number(n) => n
            .to_string()
            .parse::<BigInt>()
            .map_err(|_| invalid(format!("{} is not an integer", n))),
        other => Err(invalid(format!("expected an integer, found {}", other))),
    }
}

pub fn expect_object(value: &Value) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| invalid(format!("expected a JSON object, found {}", value)))
}

pub fn array_field<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a Vec<Value>> {
    object
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| invalid(format!("\"{}\" must be an array", key)))
}

pub fn parse_json(s: &str) -> Result<Value> {
    serde_json::from_str(s).map_err(|e| invalid(format!("malformed JSON: {}", e)))
}
