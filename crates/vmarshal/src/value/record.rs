// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Data records: schema-typed structured values.

use crate::error::{Error, Result};
use crate::registry::TypeDescriptor;
use crate::value::{ManagedObjectRef, Value};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Structured value of a named data record type.
///
/// Properties are keyed by name; an absent key means the property was not
/// supplied and is omitted from the wire.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataRecord {
    type_name: String,
    props: HashMap<String, Value>,
}

impl DataRecord {
    /// Create an empty record.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            props: HashMap::new(),
        }
    }

    /// Create a record from an existing property map.
    pub fn with_props(type_name: impl Into<String>, props: HashMap<String, Value>) -> Self {
        Self {
            type_name: type_name.into(),
            props,
        }
    }

    /// Create a record whose array properties start as empty sequences.
    pub fn from_descriptor(desc: &TypeDescriptor) -> Self {
        let props = desc
            .all_properties()
            .iter()
            .filter(|p| p.is_array)
            .map(|p| (p.name.clone(), Value::Sequence(Vec::new())))
            .collect();
        Self::with_props(desc.name.clone(), props)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Builder-style setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    /// Set a property, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.props.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.props.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.props.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    /// Get a property converted to `T`.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self.get(name).ok_or_else(|| Error::MissingProperty {
            type_name: self.type_name.clone(),
            property: name.to_string(),
        })?;
        T::from_value(value).map_err(|e| match e {
            Error::TypeMismatch {
                expected, found, ..
            } => Error::TypeMismatch {
                field: name.to_string(),
                expected,
                found,
            },
            other => other,
        })
    }

    /// Get an optional property converted to `T`.
    pub fn get_opt<T: FromValue>(&self, name: &str) -> Result<Option<T>> {
        match self.get(name) {
            Some(_) => self.get_as(name).map(Some),
            None => Ok(None),
        }
    }

    /// Iterate over present properties.
    pub fn props(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn into_props(self) -> HashMap<String, Value> {
        self.props
    }
}

/// Trait for converting from Value.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

fn mismatch(expected: &str, got: &Value) -> Error {
    Error::mismatch("", expected, got.type_name())
}

macro_rules! impl_from_value {
    ($ty:ty, $accessor:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self> {
                value.$accessor().ok_or_else(|| mismatch($name, value))
            }
        }
    };
}

impl_from_value!(bool, as_bool, "boolean");
impl_from_value!(i64, as_i64, "integer");
impl_from_value!(f64, as_f64, "float");

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("string", value))
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_datetime()
            .copied()
            .ok_or_else(|| mismatch("dateTime", value))
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| mismatch("binary", value))
    }
}

impl FromValue for ManagedObjectRef {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_reference()
            .cloned()
            .ok_or_else(|| mismatch("managed object", value))
    }
}

impl FromValue for DataRecord {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_record()
            .cloned()
            .ok_or_else(|| mismatch("data record", value))
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_sequence()
            .ok_or_else(|| mismatch("array", value))?
            .iter()
            .map(T::from_value)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeDescriptorBuilder;

    #[test]
    fn test_from_descriptor_defaults_arrays() {
        let desc = TypeDescriptorBuilder::data_record("ClusterConfigSpec")
            .optional_property("name", "string")
            .array_property("rulesSpec", "ClusterRuleSpec")
            .build();
        let record = DataRecord::from_descriptor(&desc);

        assert_eq!(record.type_name(), "ClusterConfigSpec");
        assert_eq!(
            record.get("rulesSpec").and_then(Value::as_sequence).map(<[Value]>::len),
            Some(0)
        );
        assert!(record.get("name").is_none());
    }

    #[test]
    fn test_typed_access() {
        let record = DataRecord::new("AboutInfo")
            .with("apiVersion", "7.0")
            .with("build", 1234i64)
            .with("licensed", true);

        assert_eq!(record.get_as::<String>("apiVersion").expect("version"), "7.0");
        assert_eq!(record.get_as::<i64>("build").expect("build"), 1234);
        assert!(record.get_as::<bool>("licensed").expect("licensed"));
        assert_eq!(record.get_opt::<String>("vendor").expect("opt"), None);
    }

    #[test]
    fn test_typed_access_errors() {
        let record = DataRecord::new("AboutInfo").with("build", 1234i64);

        match record.get_as::<String>("build") {
            Err(Error::TypeMismatch { field, .. }) => assert_eq!(field, "build"),
            other => panic!("expected mismatch, got {:?}", other),
        }
        assert!(matches!(
            record.get_as::<String>("apiVersion"),
            Err(Error::MissingProperty { .. })
        ));
    }

    #[test]
    fn test_sequence_conversion() {
        let record = DataRecord::new("HostListSummary").with(
            "vms",
            vec![
                Value::from(ManagedObjectRef::new("VirtualMachine", "vm-1")),
                Value::from(ManagedObjectRef::new("VirtualMachine", "vm-2")),
            ],
        );
        let vms: Vec<ManagedObjectRef> = record.get_as("vms").expect("vms");
        assert_eq!(vms.len(), 2);
        assert_eq!(vms[1].id(), "vm-2");
    }

    #[test]
    fn test_set_and_remove() {
        let mut record = DataRecord::new("Description");
        assert!(record.set("label", "a").is_none());
        assert_eq!(record.set("label", "b"), Some(Value::from("a")));
        assert_eq!(record.len(), 1);
        assert_eq!(record.remove("label"), Some(Value::from("b")));
        assert!(record.is_empty());
    }
}
