// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire-level type names and namespace constants.

use std::borrow::Cow;

/// XML Schema instance namespace (carries `xsi:type`).
pub const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// XML Schema namespace (primitive type names).
pub const NS_XSD: &str = "http://www.w3.org/2001/XMLSchema";
/// SOAP 1.1 envelope namespace.
pub const NS_SOAPENV: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Qualified name of the explicit type attribute.
pub const XSI_TYPE: &str = "xsi:type";
/// Prefix stripped from primitive names before lookup.
pub const XSD_PREFIX: &str = "xsd:";
/// Marker that introduces an array-of-T wire type name.
pub const ARRAY_PREFIX: &str = "ArrayOf";

pub const ANY_TYPE: &str = "anyType";
pub const BOOLEAN: &str = "boolean";
pub const STRING: &str = "string";
pub const INT: &str = "int";
pub const LONG: &str = "long";
pub const SHORT: &str = "short";
pub const BYTE: &str = "byte";
pub const FLOAT: &str = "float";
pub const DOUBLE: &str = "double";
pub const DATE_TIME: &str = "dateTime";
pub const BASE64_BINARY: &str = "base64Binary";

/// Root of every managed object type.
pub const MANAGED_OBJECT: &str = "ManagedObject";
/// Slot holding a reference whose concrete type travels in a `type` attribute.
pub const MANAGED_OBJECT_REFERENCE: &str = "ManagedObjectReference";
/// Root of every data record type.
pub const DATA_OBJECT: &str = "DataObject";
/// Base type fault payloads are decoded against.
pub const METHOD_FAULT: &str = "MethodFault";
/// Handle type substituted for asynchronous method results.
pub const TASK: &str = "Task";

/// Strip the primitive namespace prefix (`xsd:string` -> `string`).
pub fn normalize(name: &str) -> &str {
    name.strip_prefix(XSD_PREFIX).unwrap_or(name)
}

/// Qualified wire name for a primitive (`string` -> `xsd:string`).
pub fn qualified(name: &str) -> String {
    format!("{}{}", XSD_PREFIX, normalize(name))
}

/// Recover the scalar element type from the part after `ArrayOf`.
///
/// Array markers capitalize primitive names (`ArrayOfString`,
/// `ArrayOfDateTime`); schema type names pass through unchanged.
pub fn demangle_array_type(name: &str) -> Cow<'_, str> {
    match name {
        "AnyType" => Cow::Borrowed(ANY_TYPE),
        "DateTime" => Cow::Borrowed(DATE_TIME),
        "Boolean" | "String" | "Byte" | "Short" | "Int" | "Long" | "Float" | "Double" => {
            Cow::Owned(name.to_ascii_lowercase())
        }
        other => Cow::Borrowed(other),
    }
}
