//! Host Values
//!
//! The host hands us loosely-typed maps and arrays; the native subsystem speaks
//! JSON trees. This module owns both representations and the structural
//! conversion between them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{CheckoutError, Result};

/// A single value as the host runtime represents it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Array(Vec<HostValue>),
    Map(HostMap),
}

impl HostValue {
    /// Name of the variant, for diagnostics
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::Double(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral value; doubles without a fractional part qualify because
    /// hosts commonly carry every number as a double
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Double(d) if d.fract() == 0.0 && d.abs() < i64::MAX as f64 => Some(*d as i64),
            _ => None,
        }
    }

    pub const fn as_map(&self) -> Option<&HostMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[HostValue]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for HostValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for HostValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for HostValue {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<HostMap> for HostValue {
    fn from(m: HostMap) -> Self {
        Self::Map(m)
    }
}

/// String-keyed host map, read through typed accessors that return `None`
/// when a key is absent or holds a value of another shape
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostMap(BTreeMap<String, HostValue>);

impl HostMap {
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&HostValue> {
        self.0.get(key)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(HostValue::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(HostValue::as_bool)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(HostValue::as_i64)
    }

    pub fn get_map(&self, key: &str) -> Option<&HostMap> {
        self.get(key).and_then(HostValue::as_map)
    }

    pub fn get_array(&self, key: &str) -> Option<&[HostValue]> {
        self.get(key).and_then(HostValue::as_array)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<HostValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &HostValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, HostValue)> for HostMap {
    fn from_iter<I: IntoIterator<Item = (String, HostValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert a JSON tree into a host value
pub fn json_to_host(value: &Value) -> Result<HostValue> {
    Ok(match value {
        Value::Null => HostValue::Null,
        Value::Bool(b) => HostValue::Bool(*b),
        Value::Number(n) => number_to_host(n)?,
        Value::String(s) => HostValue::String(s.clone()),
        Value::Array(items) => {
            HostValue::Array(items.iter().map(json_to_host).collect::<Result<_>>()?)
        }
        Value::Object(object) => HostValue::Map(object_to_map(object)?),
    })
}

/// Convert a JSON object into a host map; any other JSON shape is rejected
pub fn json_to_map(value: &Value) -> Result<HostMap> {
    match value {
        Value::Object(object) => object_to_map(object),
        other => Err(CheckoutError::Conversion(format!(
            "expected a JSON object, found {}",
            json_kind(other)
        ))),
    }
}

/// Convert a host value into a JSON tree
pub fn host_to_json(value: &HostValue) -> Result<Value> {
    Ok(match value {
        HostValue::Null => Value::Null,
        HostValue::Bool(b) => Value::Bool(*b),
        HostValue::Int(i) => Value::Number((*i).into()),
        HostValue::Double(d) => Number::from_f64(*d).map(Value::Number).ok_or_else(|| {
            CheckoutError::Conversion(format!("{d} is not representable in JSON"))
        })?,
        HostValue::String(s) => Value::String(s.clone()),
        HostValue::Array(items) => {
            Value::Array(items.iter().map(host_to_json).collect::<Result<_>>()?)
        }
        HostValue::Map(map) => map_to_json(map)?,
    })
}

/// Convert a host map into a JSON object
pub fn map_to_json(map: &HostMap) -> Result<Value> {
    let mut object = Map::with_capacity(map.len());
    for (key, value) in map.iter() {
        object.insert(key.clone(), host_to_json(value)?);
    }
    Ok(Value::Object(object))
}

fn object_to_map(object: &Map<String, Value>) -> Result<HostMap> {
    object
        .iter()
        .map(|(key, value)| Ok((key.clone(), json_to_host(value)?)))
        .collect()
}

fn number_to_host(n: &Number) -> Result<HostValue> {
    if let Some(i) = n.as_i64() {
        return Ok(HostValue::Int(i));
    }
    n.as_f64()
        .map(HostValue::Double)
        .ok_or_else(|| CheckoutError::Conversion(format!("unsupported number {n}")))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
