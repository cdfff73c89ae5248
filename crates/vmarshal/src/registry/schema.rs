// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema loader.
//!
//! Turns a YAML or JSON interface description into an immutable [`Registry`].
//! The hosting application calls this once at startup and threads the
//! resulting registry into the connection.
//!
//! # Example YAML
//!
//! ```yaml
//! types:
//!   - name: ManagedEntity
//!     kind: managed
//!     properties:
//!       - { name: name, type: string }
//!     methods:
//!       - name: Rename_Task
//!         params:
//!           - { name: newName, type: string }
//!         result: { type: ManagedObjectReference, task: true }
//!
//!   - name: Folder
//!     kind: managed
//!     base: ManagedEntity
//!
//!   - name: VirtualMachinePowerState
//!     kind: enum
//!     values: [poweredOn, poweredOff, suspended]
//! ```

use crate::registry::{
    MethodDescriptor, PropertyDescriptor, Registry, ResultDescriptor, TypeDescriptor,
    TypeDescriptorBuilder,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a schema or building a registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML schema: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("type {0:?} declared more than once")]
    DuplicateType(String),

    #[error("type {type_name:?} extends unknown type {base:?}")]
    UnknownBase { type_name: String, base: String },

    #[error("type {type_name:?} cannot extend {base:?}: kinds differ")]
    BaseKindMismatch { type_name: String, base: String },

    #[error("inheritance cycle through {0:?}")]
    InheritanceCycle(String),

    #[error("{owner} refers to unknown type {wire_type:?}")]
    UnknownReference { owner: String, wire_type: String },

    #[error("type {0:?} is not a managed object but declares methods")]
    MethodsOnNonManaged(String),
}

/// Root schema document.
#[derive(Debug, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub types: Vec<SchemaType>,
}

/// Declared type kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Data,
    Managed,
    Enum,
}

/// A single type declaration.
#[derive(Debug, Deserialize)]
pub struct SchemaType {
    pub name: String,
    pub kind: SchemaKind,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub properties: Vec<SchemaProperty>,
    #[serde(default)]
    pub methods: Vec<SchemaMethod>,
    /// Enum tokens.
    #[serde(default)]
    pub values: Vec<String>,
}

/// Property or parameter declaration.
#[derive(Debug, Deserialize)]
pub struct SchemaProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub wire_type: String,
    #[serde(default)]
    pub array: bool,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Deserialize)]
pub struct SchemaMethod {
    pub name: String,
    #[serde(default)]
    pub params: Vec<SchemaProperty>,
    #[serde(default)]
    pub result: Option<SchemaResult>,
}

#[derive(Debug, Deserialize)]
pub struct SchemaResult {
    #[serde(rename = "type")]
    pub wire_type: String,
    #[serde(default)]
    pub array: bool,
    #[serde(default)]
    pub task: bool,
}

impl From<SchemaProperty> for PropertyDescriptor {
    fn from(p: SchemaProperty) -> Self {
        Self {
            name: p.name,
            wire_type: p.wire_type,
            is_array: p.array,
            is_optional: p.optional,
        }
    }
}

impl From<SchemaMethod> for MethodDescriptor {
    fn from(m: SchemaMethod) -> Self {
        Self {
            name: m.name,
            parameters: m.params.into_iter().map(Into::into).collect(),
            result: m.result.map(|r| ResultDescriptor {
                wire_type: r.wire_type,
                is_array: r.array,
                is_task: r.task,
            }),
        }
    }
}

impl SchemaType {
    fn into_descriptor(self) -> Result<TypeDescriptor, SchemaError> {
        let builder = match self.kind {
            SchemaKind::Data => TypeDescriptorBuilder::data_record(self.name.clone()),
            SchemaKind::Managed => TypeDescriptorBuilder::managed_object(self.name.clone()),
            SchemaKind::Enum => TypeDescriptorBuilder::enumeration(self.name.clone(), self.values),
        };
        if !self.methods.is_empty() && self.kind != SchemaKind::Managed {
            return Err(SchemaError::MethodsOnNonManaged(self.name));
        }

        let mut builder = match self.base {
            Some(base) => builder.base(base),
            None => builder,
        };
        for p in self.properties {
            builder = builder.property_with(p.into());
        }
        for m in self.methods {
            builder = builder.method(m.into());
        }
        Ok(builder.build())
    }
}

impl SchemaDocument {
    /// Validate and freeze into a registry.
    pub fn into_registry(self) -> Result<Registry, SchemaError> {
        let mut builder = Registry::builder();
        for t in self.types {
            builder.push(t.into_descriptor()?);
        }
        builder.build()
    }
}

/// Schema loader for YAML and JSON sources.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Load a schema file; `.json` files are parsed as JSON, anything else as YAML.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Registry, SchemaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        log::debug!("loading schema from {}", path.display());
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse_yaml(&content)
        }
    }

    /// Parse YAML schema content.
    pub fn parse_yaml(content: &str) -> Result<Registry, SchemaError> {
        let doc: SchemaDocument = serde_yaml::from_str(content)?;
        doc.into_registry()
    }

    /// Parse JSON schema content.
    pub fn parse_json(content: &str) -> Result<Registry, SchemaError> {
        let doc: SchemaDocument = serde_json::from_str(content)?;
        doc.into_registry()
    }
}

/// Load a schema from text, detecting JSON by its leading `{`.
pub fn load_schema(source: &str) -> Result<Registry, SchemaError> {
    if source.trim_start().starts_with('{') {
        SchemaLoader::parse_json(source)
    } else {
        SchemaLoader::parse_yaml(source)
    }
}
