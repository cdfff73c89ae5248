// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry for schema-driven marshalling.
//!
//! Holds every wire type the engine can encode or decode: the fixed
//! built-in set (primitives, `anyType`, binary and the three roots) plus
//! the schema-declared data records, managed objects and enumerations.
//!
//! # Features
//!
//! - **Resolution**: `resolve("xsd:string")` and `resolve("string")` are equivalent
//! - **Substitutability**: `is_subtype(candidate, expected)` over the ancestor sets
//! - **Flattened properties**: inherited members first, in declaration order
//! - **Method lookup**: searched on the managed object type and its ancestors
//!
//! The registry is immutable once built and is shared read-only (`Arc`)
//! across threads without locking.
//!
//! # Example
//!
//! ```rust
//! use vmarshal::registry::{Registry, TypeDescriptorBuilder};
//!
//! let registry = Registry::builder()
//!     .register(TypeDescriptorBuilder::managed_object("ManagedEntity").build())
//!     .register(
//!         TypeDescriptorBuilder::managed_object("Folder")
//!             .base("ManagedEntity")
//!             .build(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert!(registry.is_subtype("Folder", "ManagedEntity"));
//! assert!(registry.is_subtype("Folder", "ManagedObject"));
//! assert!(!registry.is_subtype("ManagedEntity", "Folder"));
//! ```

mod builder;
mod descriptor;
pub mod names;
mod schema;

pub use builder::{MethodDescriptorBuilder, TypeDescriptorBuilder};
pub use descriptor::{
    EnumDescriptor, MethodDescriptor, PrimitiveKind, PropertyDescriptor, ResultDescriptor,
    TypeDescriptor, TypeKind,
};
pub use schema::{load_schema, SchemaDocument, SchemaError, SchemaLoader};

use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Immutable registry of type descriptors.
#[derive(Debug)]
pub struct Registry {
    types: HashMap<String, Arc<TypeDescriptor>>,
}

impl Registry {
    /// Start building a registry on top of the built-in types.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry containing only the built-in types.
    pub fn builtin() -> Self {
        let types = builtin_types()
            .into_iter()
            .map(|d| (d.name.clone(), Arc::new(d)))
            .collect();
        Self { types }
    }

    /// Resolve a type name, failing with `UnknownType`.
    pub fn resolve(&self, name: &str) -> Result<&Arc<TypeDescriptor>> {
        self.get(name)
            .ok_or_else(|| Error::UnknownType(name.to_string()))
    }

    /// Look up a type name.
    pub fn get(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(names::normalize(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Is a value of type `candidate` acceptable where `expected` is declared?
    ///
    /// True when the names are equal, when `expected` is among the
    /// candidate's ancestors, or when `expected` is `anyType`.
    pub fn is_subtype(&self, candidate: &str, expected: &str) -> bool {
        let candidate = names::normalize(candidate);
        let expected = names::normalize(expected);
        if candidate == expected || expected == names::ANY_TYPE {
            return true;
        }
        self.get(candidate)
            .map(|d| d.ancestors.iter().any(|a| a == expected))
            .unwrap_or(false)
    }

    /// Find a property among the type's own and inherited properties.
    pub fn find_property<'a>(
        &self,
        desc: &'a TypeDescriptor,
        name: &str,
    ) -> Option<&'a PropertyDescriptor> {
        desc.property(name)
    }

    /// Find a method on a managed object type or its ancestors.
    pub fn find_method(&self, type_name: &str, method: &str) -> Result<&MethodDescriptor> {
        let desc = self.resolve(type_name)?;
        std::iter::once(desc.name.as_str())
            .chain(desc.ancestors.iter().map(String::as_str))
            .filter_map(|name| self.get(name))
            .find_map(|d| d.method(method))
            .ok_or_else(|| Error::UnknownMethod {
                type_name: type_name.to_string(),
                method: method.to_string(),
            })
    }

    /// Number of registered types, built-ins included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered type names, in no particular order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

/// Collects schema-declared descriptors and validates them into a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    types: Vec<TypeDescriptor>,
}

impl RegistryBuilder {
    /// Add a descriptor.
    pub fn register(mut self, desc: TypeDescriptor) -> Self {
        self.types.push(desc);
        self
    }

    /// Add a descriptor in place.
    pub fn push(&mut self, desc: TypeDescriptor) {
        self.types.push(desc);
    }

    /// Validate inheritance and type references, then freeze.
    pub fn build(self) -> std::result::Result<Registry, SchemaError> {
        let mut types: HashMap<String, TypeDescriptor> = builtin_types()
            .into_iter()
            .map(|d| (d.name.clone(), d))
            .collect();
        let declared = self.types.len();

        for desc in self.types {
            if types.contains_key(&desc.name) {
                return Err(SchemaError::DuplicateType(desc.name));
            }
            types.insert(desc.name.clone(), desc);
        }

        let mut resolved = Vec::new();
        for (name, desc) in &types {
            if !desc.kind.is_composite() {
                continue;
            }
            let ancestors = ancestry(&types, desc)?;
            let mut props = Vec::new();
            for ancestor in ancestors.iter().rev() {
                if let Some(a) = types.get(ancestor) {
                    props.extend(a.properties.iter().cloned());
                }
            }
            props.extend(desc.properties.iter().cloned());
            resolved.push((name.clone(), ancestors, props));
        }
        for (name, ancestors, props) in resolved {
            if let Some(desc) = types.get_mut(&name) {
                desc.ancestors = ancestors;
                desc.all_properties = props;
            }
        }

        for desc in types.values() {
            check_references(&types, desc)?;
        }

        log::debug!(
            "type registry built: {} declared types, {} total",
            declared,
            types.len()
        );

        Ok(Registry {
            types: types.into_iter().map(|(k, v)| (k, Arc::new(v))).collect(),
        })
    }
}

/// Walk the base chain of `desc`, nearest ancestor first.
fn ancestry(
    types: &HashMap<String, TypeDescriptor>,
    desc: &TypeDescriptor,
) -> std::result::Result<Vec<String>, SchemaError> {
    let mut chain = Vec::new();
    let mut seen = HashSet::from([desc.name.as_str()]);
    let mut current = desc;

    while let Some(base) = current.base.as_deref() {
        let parent = types
            .get(names::normalize(base))
            .ok_or_else(|| SchemaError::UnknownBase {
                type_name: desc.name.clone(),
                base: base.to_string(),
            })?;
        if std::mem::discriminant(&parent.kind) != std::mem::discriminant(&desc.kind) {
            return Err(SchemaError::BaseKindMismatch {
                type_name: desc.name.clone(),
                base: parent.name.clone(),
            });
        }
        if !seen.insert(parent.name.as_str()) {
            return Err(SchemaError::InheritanceCycle(desc.name.clone()));
        }
        chain.push(parent.name.clone());
        current = parent;
    }

    if let Some(root) = desc.kind.root() {
        if desc.name != root && !chain.iter().any(|a| a == root) {
            chain.push(root.to_string());
        }
    }
    Ok(chain)
}

/// Every property, parameter and result type must resolve.
fn check_references(
    types: &HashMap<String, TypeDescriptor>,
    desc: &TypeDescriptor,
) -> std::result::Result<(), SchemaError> {
    let known = |wire_type: &str| types.contains_key(names::normalize(wire_type));

    for p in &desc.properties {
        if !known(&p.wire_type) {
            return Err(SchemaError::UnknownReference {
                owner: format!("{}.{}", desc.name, p.name),
                wire_type: p.wire_type.clone(),
            });
        }
    }
    for m in &desc.methods {
        for p in &m.parameters {
            if !known(&p.wire_type) {
                return Err(SchemaError::UnknownReference {
                    owner: format!("{}.{}({})", desc.name, m.name, p.name),
                    wire_type: p.wire_type.clone(),
                });
            }
        }
        if let Some(r) = &m.result {
            if !known(r.decode_type()) {
                return Err(SchemaError::UnknownReference {
                    owner: format!("{}.{}", desc.name, m.name),
                    wire_type: r.decode_type().to_string(),
                });
            }
        }
    }
    Ok(())
}

fn builtin_types() -> Vec<TypeDescriptor> {
    use names::*;

    let mut types = vec![
        TypeDescriptor::new(ANY_TYPE, TypeKind::AnyType),
        TypeDescriptor::primitive(BOOLEAN, PrimitiveKind::Boolean),
        TypeDescriptor::primitive(STRING, PrimitiveKind::String),
        TypeDescriptor::primitive(DATE_TIME, PrimitiveKind::DateTime),
        TypeDescriptor::new(BASE64_BINARY, TypeKind::Binary),
        TypeDescriptor::new(MANAGED_OBJECT, TypeKind::ManagedObject),
        TypeDescriptor::new(MANAGED_OBJECT_REFERENCE, TypeKind::ManagedObjectReference),
        TypeDescriptor::new(DATA_OBJECT, TypeKind::DataRecord),
    ];
    for name in [INT, LONG, SHORT, BYTE] {
        types.push(TypeDescriptor::primitive(name, PrimitiveKind::Integer));
    }
    for name in [FLOAT, DOUBLE] {
        types.push(TypeDescriptor::primitive(name, PrimitiveKind::Float));
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Registry {
        Registry::builder()
            .register(
                TypeDescriptorBuilder::managed_object("ManagedEntity")
                    .property("name", "string")
                    .method(
                        MethodDescriptorBuilder::new("Destroy_Task")
                            .returns_task()
                            .build(),
                    )
                    .build(),
            )
            .register(
                TypeDescriptorBuilder::managed_object("Folder")
                    .base("ManagedEntity")
                    .array_property("childEntity", "ManagedEntity")
                    .build(),
            )
            .register(TypeDescriptorBuilder::managed_object("Task").build())
            .register(
                TypeDescriptorBuilder::data_record("MethodFault")
                    .optional_property("faultMessage", "string")
                    .build(),
            )
            .register(
                TypeDescriptorBuilder::data_record("InvalidName")
                    .base("MethodFault")
                    .property("name", "string")
                    .build(),
            )
            .build()
            .expect("valid registry")
    }

    #[test]
    fn test_builtins_resolve() {
        let registry = Registry::builtin();
        for name in [
            "anyType",
            "boolean",
            "string",
            "int",
            "long",
            "short",
            "byte",
            "float",
            "double",
            "dateTime",
            "base64Binary",
        ] {
            assert!(registry.contains(name), "{name} missing");
        }
        assert_eq!(
            registry.resolve("xsd:long").map(|d| d.kind.clone()).ok(),
            Some(TypeKind::Primitive(PrimitiveKind::Integer))
        );
    }

    #[test]
    fn test_unknown_type() {
        let registry = Registry::builtin();
        match registry.resolve("NoSuchThing") {
            Err(Error::UnknownType(name)) => assert_eq!(name, "NoSuchThing"),
            other => panic!("expected UnknownType, got {:?}", other),
        }
    }

    #[test]
    fn test_subtype_chain() {
        let registry = sample();
        assert!(registry.is_subtype("Folder", "Folder"));
        assert!(registry.is_subtype("Folder", "ManagedEntity"));
        assert!(registry.is_subtype("Folder", "ManagedObject"));
        assert!(!registry.is_subtype("ManagedEntity", "Folder"));
        assert!(registry.is_subtype("InvalidName", "MethodFault"));
        assert!(registry.is_subtype("InvalidName", "DataObject"));
        assert!(!registry.is_subtype("InvalidName", "ManagedObject"));
        assert!(!registry.is_subtype("Unregistered", "Folder"));
    }

    #[test]
    fn test_any_type_accepts_everything() {
        let registry = sample();
        assert!(registry.is_subtype("Folder", "anyType"));
        assert!(registry.is_subtype("xsd:string", "xsd:anyType"));
    }

    #[test]
    fn test_ancestor_order() {
        let registry = sample();
        let folder = registry.resolve("Folder").expect("Folder");
        assert_eq!(folder.ancestors(), ["ManagedEntity", "ManagedObject"]);
    }

    #[test]
    fn test_inherited_properties() {
        let registry = sample();
        let folder = registry.resolve("Folder").expect("Folder");
        let names: Vec<_> = folder.all_properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["name", "childEntity"]);
        assert!(registry.find_property(folder, "name").is_some());
        assert!(registry.find_property(folder, "bogus").is_none());
    }

    #[test]
    fn test_find_method_through_ancestor() {
        let registry = sample();
        let m = registry.find_method("Folder", "Destroy_Task").expect("inherited");
        assert!(m.result.as_ref().is_some_and(|r| r.is_task));
        assert!(matches!(
            registry.find_method("Folder", "PowerOnVM_Task"),
            Err(Error::UnknownMethod { .. })
        ));
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let result = Registry::builder()
            .register(TypeDescriptorBuilder::data_record("A").build())
            .register(TypeDescriptorBuilder::data_record("A").build())
            .build();
        assert!(matches!(result, Err(SchemaError::DuplicateType(n)) if n == "A"));

        let result = Registry::builder()
            .register(TypeDescriptorBuilder::data_record("string").build())
            .build();
        assert!(matches!(result, Err(SchemaError::DuplicateType(_))));
    }

    #[test]
    fn test_unknown_base_rejected() {
        let result = Registry::builder()
            .register(TypeDescriptorBuilder::data_record("A").base("Missing").build())
            .build();
        assert!(matches!(result, Err(SchemaError::UnknownBase { .. })));
    }

    #[test]
    fn test_cycle_rejected() {
        let result = Registry::builder()
            .register(TypeDescriptorBuilder::data_record("A").base("B").build())
            .register(TypeDescriptorBuilder::data_record("B").base("A").build())
            .build();
        assert!(matches!(result, Err(SchemaError::InheritanceCycle(_))));
    }

    #[test]
    fn test_base_kind_mismatch_rejected() {
        let result = Registry::builder()
            .register(TypeDescriptorBuilder::managed_object("Entity").build())
            .register(TypeDescriptorBuilder::data_record("Spec").base("Entity").build())
            .build();
        assert!(matches!(result, Err(SchemaError::BaseKindMismatch { .. })));
    }

    #[test]
    fn test_unknown_property_type_rejected() {
        let result = Registry::builder()
            .register(
                TypeDescriptorBuilder::data_record("Spec")
                    .property("device", "VirtualDevice")
                    .build(),
            )
            .build();
        assert!(matches!(result, Err(SchemaError::UnknownReference { .. })));
    }
}
