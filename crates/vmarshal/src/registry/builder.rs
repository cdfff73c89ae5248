// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for type and method descriptors.

use crate::registry::{
    EnumDescriptor, MethodDescriptor, PropertyDescriptor, ResultDescriptor, TypeDescriptor,
    TypeKind,
};

/// Builder for creating TypeDescriptor instances.
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    kind: TypeKind,
    base: Option<String>,
    properties: Vec<PropertyDescriptor>,
    methods: Vec<MethodDescriptor>,
}

impl TypeDescriptorBuilder {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            base: None,
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Start a data record type.
    pub fn data_record(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::DataRecord)
    }

    /// Start a managed object type.
    pub fn managed_object(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::ManagedObject)
    }

    /// Start an enumeration type.
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(name, TypeKind::Enum(EnumDescriptor::new(values)))
    }

    /// Set the direct base type.
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Add a required scalar property.
    pub fn property(mut self, name: impl Into<String>, wire_type: impl Into<String>) -> Self {
        self.properties
            .push(PropertyDescriptor::new(name, wire_type));
        self
    }

    /// Add an optional scalar property.
    pub fn optional_property(
        mut self,
        name: impl Into<String>,
        wire_type: impl Into<String>,
    ) -> Self {
        self.properties
            .push(PropertyDescriptor::new(name, wire_type).optional());
        self
    }

    /// Add an optional array property.
    pub fn array_property(mut self, name: impl Into<String>, wire_type: impl Into<String>) -> Self {
        self.properties
            .push(PropertyDescriptor::new(name, wire_type).array().optional());
        self
    }

    /// Add a fully specified property.
    pub fn property_with(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Add a method (managed objects).
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        let mut desc = TypeDescriptor::new(self.name, self.kind);
        desc.base = self.base;
        desc.all_properties = self.properties.clone();
        desc.properties = self.properties;
        desc.methods = self.methods;
        desc
    }
}

/// Builder for creating MethodDescriptor instances.
#[derive(Debug)]
pub struct MethodDescriptorBuilder {
    method: MethodDescriptor,
}

impl MethodDescriptorBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            method: MethodDescriptor::new(name),
        }
    }

    /// Add a required scalar parameter.
    pub fn param(mut self, name: impl Into<String>, wire_type: impl Into<String>) -> Self {
        self.method
            .parameters
            .push(PropertyDescriptor::new(name, wire_type));
        self
    }

    /// Add an optional scalar parameter.
    pub fn optional_param(mut self, name: impl Into<String>, wire_type: impl Into<String>) -> Self {
        self.method
            .parameters
            .push(PropertyDescriptor::new(name, wire_type).optional());
        self
    }

    /// Add a required array parameter.
    pub fn array_param(mut self, name: impl Into<String>, wire_type: impl Into<String>) -> Self {
        self.method
            .parameters
            .push(PropertyDescriptor::new(name, wire_type).array());
        self
    }

    /// Declare a scalar result.
    pub fn returns(mut self, wire_type: impl Into<String>) -> Self {
        self.method.result = Some(ResultDescriptor::new(wire_type));
        self
    }

    /// Declare an array result.
    pub fn returns_array(mut self, wire_type: impl Into<String>) -> Self {
        self.method.result = Some(ResultDescriptor::new(wire_type).array());
        self
    }

    /// Declare an asynchronous result decoded as a task handle.
    pub fn returns_task(mut self) -> Self {
        self.method.result = Some(ResultDescriptor::new("ManagedObjectReference").task());
        self
    }

    pub fn build(self) -> MethodDescriptor {
        self.method
    }
}
