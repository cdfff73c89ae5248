// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value -> XML element encoding.

use crate::codec::{format_datetime, format_float, wire_name};
use crate::error::{Error, Result};
use crate::registry::names::{self, XSI_TYPE};
use crate::registry::{PrimitiveKind, Registry, TypeDescriptor, TypeKind};
use crate::value::{DataRecord, ManagedObjectRef, Value};
use crate::xml::{self, Element};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Schema-driven encoder.
///
/// A pure function of the registry and its inputs; holds no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    registry: &'a Registry,
}

impl<'a> Encoder<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Encode `value` as zero or more elements named `name`.
    ///
    /// Arrays are flattened into one sibling per item; every other value
    /// produces exactly one element.
    pub fn encode(
        &self,
        name: &str,
        expected: &str,
        is_array: bool,
        value: &Value,
    ) -> Result<Vec<Element>> {
        match value {
            Value::Sequence(items) => {
                if !is_array {
                    return Err(Error::UnexpectedArray {
                        field: name.to_string(),
                        expected: expected.to_string(),
                    });
                }
                items
                    .iter()
                    .map(|item| self.encode_scalar(name, expected, item))
                    .collect()
            }
            _ if is_array => Err(Error::ArrayExpected {
                field: name.to_string(),
                expected: expected.to_string(),
            }),
            _ => Ok(vec![self.encode_scalar(name, expected, value)?]),
        }
    }

    /// Encode a managed object reference where `expected` is declared.
    pub fn encode_reference(
        &self,
        name: &str,
        expected: &str,
        reference: &ManagedObjectRef,
    ) -> Result<Element> {
        let expected_desc = self.registry.resolve(expected)?;
        self.reference_element(name, expected_desc, reference)
    }

    fn encode_scalar(&self, name: &str, expected: &str, value: &Value) -> Result<Element> {
        let expected_desc = self.registry.resolve(expected)?;
        let under_any = expected_desc.is_any_type();
        log::trace!("encode <{}> {} as {}", name, value.tag(), expected_desc.name);

        let element = match value {
            Value::ManagedObject(r) => self.reference_element(name, expected_desc, r)?,
            Value::Record(record) => self.record_element(name, expected_desc, record)?,
            Value::Fields(fields) => {
                if !expected_desc.is_data_record() {
                    return Err(Error::mismatch(name, &expected_desc.name, value.tag()));
                }
                let record = DataRecord::with_props(expected_desc.name.clone(), fields.clone());
                self.record_element(name, expected_desc, &record)?
            }
            Value::Enum { type_name, token } => {
                match &expected_desc.kind {
                    TypeKind::AnyType | TypeKind::Primitive(PrimitiveKind::String) => {}
                    TypeKind::Enum(tokens) if expected_desc.name == *type_name => {
                        if !tokens.contains(token) {
                            return Err(Error::UnencodableValue {
                                field: name.to_string(),
                                found: format!("{} token {:?}", type_name, token),
                            });
                        }
                    }
                    _ => return Err(Error::mismatch(name, &expected_desc.name, type_name)),
                }
                let el = Element::new(name).with_text(xml_text(name, token)?);
                if under_any {
                    el.with_attr(XSI_TYPE, type_name.as_str())
                } else {
                    el
                }
            }
            Value::Bool(b) => {
                let accepted = under_any
                    || matches!(
                        expected_desc.kind,
                        TypeKind::Primitive(PrimitiveKind::Boolean)
                    );
                if !accepted {
                    return Err(Error::mismatch(name, &expected_desc.name, value.tag()));
                }
                primitive(name, under_any, PrimitiveKind::Boolean, b.to_string())
            }
            Value::String(s) => {
                if matches!(expected_desc.kind, TypeKind::Binary) {
                    Element::new(name).with_text(STANDARD.encode(s.as_bytes()))
                } else {
                    primitive(name, under_any, PrimitiveKind::String, xml_text(name, s)?)
                }
            }
            Value::Binary(bytes) => {
                let el = Element::new(name).with_text(STANDARD.encode(bytes));
                if under_any {
                    el.with_attr(XSI_TYPE, names::qualified(names::BASE64_BINARY))
                } else {
                    el
                }
            }
            Value::Int(i) => primitive(name, under_any, PrimitiveKind::Integer, i.to_string()),
            Value::Float(f) => primitive(name, under_any, PrimitiveKind::Float, format_float(*f)),
            Value::DateTime(dt) => {
                primitive(name, under_any, PrimitiveKind::DateTime, format_datetime(dt))
            }
            Value::AnyTypeBox { wire_type, value } => {
                if !self.registry.is_subtype(wire_type, &expected_desc.name) {
                    return Err(Error::mismatch(name, &expected_desc.name, wire_type));
                }
                let boxed = self.registry.resolve(wire_type)?;
                let mut el = self.encode_scalar(name, &boxed.name, value)?;
                el.set_attr(XSI_TYPE, wire_name(boxed));
                el
            }
            Value::Sequence(_) => {
                return Err(Error::UnexpectedArray {
                    field: name.to_string(),
                    expected: expected_desc.name.clone(),
                })
            }
        };
        Ok(element)
    }

    fn reference_element(
        &self,
        name: &str,
        expected: &TypeDescriptor,
        reference: &ManagedObjectRef,
    ) -> Result<Element> {
        let concrete = self.registry.resolve(reference.type_name())?;
        if !concrete.is_managed_object() {
            return Err(Error::UnexpectedType {
                element: name.to_string(),
                type_name: concrete.name.clone(),
            });
        }
        let accepted = match expected.kind {
            TypeKind::ManagedObjectReference | TypeKind::AnyType => true,
            _ => self.registry.is_subtype(&concrete.name, &expected.name),
        };
        if !accepted {
            return Err(Error::mismatch(name, &expected.name, &concrete.name));
        }

        let el = Element::new(name)
            .with_attr("type", concrete.name.as_str())
            .with_text(reference.id());
        Ok(if expected.is_any_type() {
            el.with_attr(XSI_TYPE, names::MANAGED_OBJECT_REFERENCE)
        } else {
            el
        })
    }

    fn record_element(
        &self,
        name: &str,
        expected: &TypeDescriptor,
        record: &DataRecord,
    ) -> Result<Element> {
        let desc = self.registry.resolve(record.type_name())?;
        if !desc.is_data_record() {
            return Err(Error::UnexpectedType {
                element: name.to_string(),
                type_name: desc.name.clone(),
            });
        }
        if !self.registry.is_subtype(&desc.name, &expected.name) {
            return Err(Error::mismatch(name, &expected.name, &desc.name));
        }

        let mut el = Element::new(name).with_attr(XSI_TYPE, desc.name.as_str());
        for prop in desc.all_properties() {
            let Some(value) = record.get(&prop.name) else {
                continue;
            };
            for child in self.encode(&prop.name, &prop.wire_type, prop.is_array, value)? {
                el.push_child(child);
            }
        }
        Ok(el)
    }
}

/// Text content, rejected when it holds characters XML 1.0 cannot carry.
fn xml_text<'v>(name: &str, text: &'v str) -> Result<&'v str> {
    match text.chars().find(|c| !xml::is_xml_char(*c)) {
        None => Ok(text),
        Some(c) => Err(Error::UnencodableValue {
            field: name.to_string(),
            found: format!("string with character U+{:04X}", u32::from(c)),
        }),
    }
}

fn primitive(name: &str, under_any: bool, kind: PrimitiveKind, text: impl Into<String>) -> Element {
    let el = Element::new(name).with_text(text);
    if under_any {
        el.with_attr(XSI_TYPE, kind.any_type_name())
    } else {
        el
    }
}
