// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! XML element -> Value decoding.

use crate::codec::{parse_datetime, parse_float};
use crate::error::{Error, Result};
use crate::registry::names::{self, ARRAY_PREFIX, NS_XSI};
use crate::registry::{PrimitiveKind, Registry, TypeDescriptor, TypeKind};
use crate::value::{DataRecord, Dispatch, ManagedObjectRef, Value};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use roxmltree::Node;
use std::sync::Weak;

/// Schema-driven decoder.
///
/// Managed object references it produces are bound to `session` when one
/// is set.
#[derive(Clone)]
pub struct Decoder<'a> {
    registry: &'a Registry,
    session: Option<Weak<dyn Dispatch>>,
}

impl<'a> Decoder<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            session: None,
        }
    }

    /// Bind decoded references to a connection.
    pub fn with_session(mut self, session: Weak<dyn Dispatch>) -> Self {
        self.session = Some(session);
        self
    }

    /// Decode `node`, using its `xsi:type` when present and `declared` otherwise.
    pub fn decode(&self, node: Node<'_, '_>, declared: &str) -> Result<Value> {
        let effective = node
            .attribute((NS_XSI, "type"))
            .map(strip_prefix)
            .unwrap_or(declared);

        if let Some(inner) = effective.strip_prefix(ARRAY_PREFIX) {
            let item_type = names::demangle_array_type(inner);
            return node
                .children()
                .filter(Node::is_element)
                .map(|child| self.decode(child, &item_type))
                .collect::<Result<Vec<_>>>()
                .map(Value::Sequence);
        }

        let desc = self.registry.resolve(effective)?;
        let element = node.tag_name().name();
        log::trace!("decode <{}> as {}", element, desc.name);

        match &desc.kind {
            TypeKind::DataRecord => self.decode_record(node, desc),
            TypeKind::ManagedObjectReference => {
                let type_name = node
                    .attribute("type")
                    .ok_or_else(|| Error::MissingTypeAttribute(element.to_string()))?;
                self.reference(node, type_name)
            }
            TypeKind::ManagedObject => {
                let type_name = node.attribute("type").unwrap_or(&desc.name);
                self.reference(node, type_name)
            }
            TypeKind::Enum(_) => Ok(Value::Enum {
                type_name: desc.name.clone(),
                token: text(node).to_string(),
            }),
            TypeKind::Primitive(kind) => decode_primitive(node, desc, *kind),
            TypeKind::Binary => {
                let compact: String = text(node).split_whitespace().collect();
                STANDARD
                    .decode(compact.as_bytes())
                    .map(Value::Binary)
                    .map_err(|_| malformed(node, desc))
            }
            TypeKind::AnyType => Err(Error::UndecodableAnyType(element.to_string())),
        }
    }

    fn decode_record(&self, node: Node<'_, '_>, desc: &TypeDescriptor) -> Result<Value> {
        let mut record = DataRecord::from_descriptor(desc);

        for child in node.children().filter(Node::is_element) {
            let name = child.tag_name().name();
            let Some(prop) = desc.property(name) else {
                log::trace!("skipping unknown element <{}> in {}", name, desc.name);
                continue;
            };
            let value = self.decode(child, &prop.wire_type)?;
            if prop.is_array {
                match record.get_mut(name) {
                    Some(Value::Sequence(items)) => items.push(value),
                    _ => {
                        record.set(name, vec![value]);
                    }
                }
            } else {
                record.set(name, value);
            }
        }
        Ok(Value::Record(record))
    }

    fn reference(&self, node: Node<'_, '_>, type_name: &str) -> Result<Value> {
        let desc = self.registry.resolve(type_name)?;
        if !desc.is_managed_object() {
            return Err(Error::UnexpectedType {
                element: node.tag_name().name().to_string(),
                type_name: desc.name.clone(),
            });
        }
        let reference = ManagedObjectRef::new(desc.name.clone(), text(node));
        Ok(Value::ManagedObject(match &self.session {
            Some(session) => reference.bind(session.clone()),
            None => reference,
        }))
    }
}

fn decode_primitive(node: Node<'_, '_>, desc: &TypeDescriptor, kind: PrimitiveKind) -> Result<Value> {
    let raw = text(node);
    match kind {
        PrimitiveKind::String => Ok(Value::String(raw.to_string())),
        PrimitiveKind::Boolean => Ok(Value::Bool(matches!(raw.trim(), "true" | "1"))),
        PrimitiveKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| malformed(node, desc)),
        PrimitiveKind::Float => parse_float(raw.trim())
            .map(Value::Float)
            .ok_or_else(|| malformed(node, desc)),
        PrimitiveKind::DateTime => parse_datetime(raw.trim())
            .map(Value::DateTime)
            .ok_or_else(|| malformed(node, desc)),
    }
}

fn text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().unwrap_or("")
}

/// `vim25:Folder` -> `Folder`; primitive prefixes are kept for the registry.
fn strip_prefix(type_name: &str) -> &str {
    if type_name.starts_with(names::XSD_PREFIX) {
        return type_name;
    }
    type_name
        .split_once(':')
        .map(|(_, local)| local)
        .unwrap_or(type_name)
}

fn malformed(node: Node<'_, '_>, desc: &TypeDescriptor) -> Error {
    Error::MalformedValue {
        element: node.tag_name().name().to_string(),
        type_name: desc.name.clone(),
        text: text(node).to_string(),
    }
}
