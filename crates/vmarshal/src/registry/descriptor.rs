// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type, property and method descriptors.

use crate::registry::names;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    String,
    Integer,
    Float,
    DateTime,
}

impl PrimitiveKind {
    /// Wire name stamped when the value sits in an anyType slot.
    pub fn any_type_name(&self) -> &'static str {
        match self {
            Self::Boolean => "xsd:boolean",
            Self::String => "xsd:string",
            Self::Integer => "xsd:long",
            Self::Float => "xsd:double",
            Self::DateTime => "xsd:dateTime",
        }
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Primitive type.
    Primitive(PrimitiveKind),
    /// Enumeration of string tokens.
    Enum(EnumDescriptor),
    /// Structured value sent by value.
    DataRecord,
    /// Remote object identified by reference.
    ManagedObject,
    /// Reference slot whose concrete type travels on the wire.
    ManagedObjectReference,
    /// Slot with no static type.
    AnyType,
    /// Raw bytes, base64 on the wire.
    Binary,
}

impl TypeKind {
    /// Data records and managed objects carry properties and ancestors.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::DataRecord | Self::ManagedObject)
    }

    /// Name of the implicit root for composite kinds.
    pub(crate) fn root(&self) -> Option<&'static str> {
        match self {
            Self::DataRecord => Some(names::DATA_OBJECT),
            Self::ManagedObject => Some(names::MANAGED_OBJECT),
            _ => None,
        }
    }
}

/// A complete type descriptor.
///
/// `ancestors` and the flattened property list are filled in when the
/// descriptor is registered; before that they only reflect the type itself.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Wire type name.
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
    /// Direct base type, as declared.
    pub base: Option<String>,
    /// Properties declared on this type only.
    pub properties: Vec<PropertyDescriptor>,
    /// Methods declared on this type only (managed objects).
    pub methods: Vec<MethodDescriptor>,
    pub(crate) ancestors: Vec<String>,
    pub(crate) all_properties: Vec<PropertyDescriptor>,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            base: None,
            properties: Vec::new(),
            methods: Vec::new(),
            ancestors: Vec::new(),
            all_properties: Vec::new(),
        }
    }

    /// Create a primitive type descriptor.
    pub fn primitive(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self::new(name, TypeKind::Primitive(kind))
    }

    pub fn is_data_record(&self) -> bool {
        matches!(self.kind, TypeKind::DataRecord)
    }

    pub fn is_managed_object(&self) -> bool {
        matches!(self.kind, TypeKind::ManagedObject)
    }

    pub fn is_any_type(&self) -> bool {
        matches!(self.kind, TypeKind::AnyType)
    }

    /// Ancestor names, nearest first, ending at the kind's root.
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// Own and inherited properties, inherited first, in declaration order.
    pub fn all_properties(&self) -> &[PropertyDescriptor] {
        &self.all_properties
    }

    /// Look up a property among own and inherited properties.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.all_properties.iter().find(|p| p.name == name)
    }

    /// Look up a method declared on this type only.
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Enum tokens, if this is an enumeration.
    pub fn enum_values(&self) -> Option<&[String]> {
        match &self.kind {
            TypeKind::Enum(e) => Some(&e.values),
            _ => None,
        }
    }
}

/// Property descriptor for data record and managed object members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Property (and element) name.
    pub name: String,
    /// Declared wire type name.
    pub wire_type: String,
    /// Repeated as sibling elements.
    pub is_array: bool,
    /// May be omitted.
    pub is_optional: bool,
}

impl PropertyDescriptor {
    /// Create a new scalar, required property.
    pub fn new(name: impl Into<String>, wire_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wire_type: wire_type.into(),
            is_array: false,
            is_optional: false,
        }
    }

    /// Mark as array.
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Mark as optional.
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }
}

/// Declared result of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultDescriptor {
    pub wire_type: String,
    pub is_array: bool,
    /// Decoded as a `Task` handle instead of `wire_type`.
    pub is_task: bool,
}

impl ResultDescriptor {
    pub fn new(wire_type: impl Into<String>) -> Self {
        Self {
            wire_type: wire_type.into(),
            is_array: false,
            is_task: false,
        }
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn task(mut self) -> Self {
        self.is_task = true;
        self
    }

    /// Type the result elements are decoded against.
    pub fn decode_type(&self) -> &str {
        if self.is_task {
            names::TASK
        } else {
            &self.wire_type
        }
    }
}

/// Remote method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Method (and request element) name.
    pub name: String,
    /// Parameters in wire order.
    pub parameters: Vec<PropertyDescriptor>,
    /// `None` for methods without a result.
    pub result: Option<ResultDescriptor>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            result: None,
        }
    }

    /// Get parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Enumeration type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumDescriptor {
    /// Declared tokens.
    pub values: Vec<String>,
}

impl EnumDescriptor {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.values.iter().any(|v| v == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_flags() {
        let p = PropertyDescriptor::new("disk", "VirtualDisk").array().optional();
        assert!(p.is_array);
        assert!(p.is_optional);
        assert_eq!(p.wire_type, "VirtualDisk");
    }

    #[test]
    fn test_result_decode_type() {
        let plain = ResultDescriptor::new("ManagedObjectReference");
        assert_eq!(plain.decode_type(), "ManagedObjectReference");

        let task = ResultDescriptor::new("ManagedObjectReference").task();
        assert_eq!(task.decode_type(), "Task");
    }

    #[test]
    fn test_enum_descriptor() {
        let e = EnumDescriptor::new(vec!["poweredOn".into(), "poweredOff".into()]);
        assert!(e.contains("poweredOn"));
        assert!(!e.contains("suspended"));
    }

    #[test]
    fn test_kind_roots() {
        assert_eq!(TypeKind::DataRecord.root(), Some("DataObject"));
        assert_eq!(TypeKind::ManagedObject.root(), Some("ManagedObject"));
        assert_eq!(TypeKind::Binary.root(), None);
        assert!(TypeKind::ManagedObject.is_composite());
        assert!(!TypeKind::AnyType.is_composite());
    }
}
