// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value types moved between the wire and memory.

mod record;
mod reference;

pub use record::{DataRecord, FromValue};
pub use reference::{Dispatch, ManagedObjectRef};

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Name-keyed method parameters.
pub type Params = HashMap<String, Value>;

/// A dynamic value that can hold any wire type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // Primitives
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(DateTime<Utc>),
    Binary(Vec<u8>),

    /// Enumeration token tagged with its enum type.
    Enum { type_name: String, token: String },
    ManagedObject(ManagedObjectRef),
    Record(DataRecord),
    Sequence(Vec<Value>),

    /// Untyped field bundle, coerced to the expected record type on encode.
    Fields(HashMap<String, Value>),
    /// Encode-only: forces `xsi:type` to `wire_type`.
    AnyTypeBox { wire_type: String, value: Box<Value> },
}

impl Value {
    /// Wrap a value so it is emitted with an explicit wire type.
    pub fn any(wire_type: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::AnyTypeBox {
            wire_type: wire_type.into(),
            value: Box::new(value.into()),
        }
    }

    /// Enumeration token.
    pub fn enumeration(type_name: impl Into<String>, token: impl Into<String>) -> Self {
        Self::Enum {
            type_name: type_name.into(),
            token: token.into(),
        }
    }

    /// Raw bytes.
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Binary(bytes.into())
    }

    /// Untyped field bundle.
    pub fn fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::Fields(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Short tag name used in diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::DateTime(_) => "dateTime",
            Self::Binary(_) => "binary",
            Self::Enum { .. } => "enum",
            Self::ManagedObject(_) => "managed object",
            Self::Record(_) => "data record",
            Self::Sequence(_) => "array",
            Self::Fields(_) => "untyped fields",
            Self::AnyTypeBox { .. } => "anyType box",
        }
    }

    /// Concrete type name for diagnostics (`Folder`, `VirtualMachineConfigSpec`, `string`).
    pub fn type_name(&self) -> &str {
        match self {
            Self::Enum { type_name, .. } => type_name,
            Self::ManagedObject(r) => r.type_name(),
            Self::Record(r) => r.type_name(),
            Self::AnyTypeBox { wire_type, .. } => wire_type,
            other => other.tag(),
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// String text, or the token of an enum.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            Self::Enum { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&DataRecord> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ManagedObjectRef> {
        match self {
            Self::ManagedObject(r) => Some(r),
            _ => None,
        }
    }

    /// Property of a record value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_record().and_then(|r| r.get(name))
    }
}

// Conversion traits
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<ManagedObjectRef> for Value {
    fn from(v: ManagedObjectRef) -> Self {
        Self::ManagedObject(v)
    }
}

impl From<DataRecord> for Value {
    fn from(v: DataRecord) -> Self {
        Self::Record(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Sequence(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_primitive_values() {
        let v = Value::from(42i64);
        assert_eq!(v.as_i64(), Some(42));
        assert_eq!(v.as_f64(), None);

        let v = Value::from(std::f64::consts::PI);
        assert_eq!(v.as_f64(), Some(std::f64::consts::PI));

        let v = Value::from("hello");
        assert_eq!(v.as_str(), Some("hello"));

        let when = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(Value::from(when).as_datetime(), Some(&when));
    }

    #[test]
    fn test_sequence_value() {
        let v = Value::from(vec![1i64, 2, 3]);
        let seq = v.as_sequence().expect("sequence");
        assert_eq!(seq.len(), 3);
        assert_eq!(seq[2].as_i64(), Some(3));
        assert!(v.is_sequence());
    }

    #[test]
    fn test_enum_value() {
        let v = Value::enumeration("VirtualMachinePowerState", "poweredOn");
        assert_eq!(v.as_str(), Some("poweredOn"));
        assert_eq!(v.type_name(), "VirtualMachinePowerState");
    }

    #[test]
    fn test_any_box() {
        let v = Value::any("xsd:int", 5i64);
        match &v {
            Value::AnyTypeBox { wire_type, value } => {
                assert_eq!(wire_type, "xsd:int");
                assert_eq!(value.as_i64(), Some(5));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_record_accessor() {
        let record = DataRecord::new("Description").with("label", "disk");
        let v = Value::from(record);
        assert_eq!(v.get("label").and_then(Value::as_str), Some("disk"));
        assert_eq!(v.type_name(), "Description");
        assert!(Value::from(1i64).get("label").is_none());
    }

    #[test]
    fn test_fields_bundle() {
        let v = Value::fields([("key", Value::from("a")), ("value", Value::from(1i64))]);
        match v {
            Value::Fields(map) => assert_eq!(map.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }
}
