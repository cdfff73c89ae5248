// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-driven XML encoding and decoding.
//!
//! The [`Encoder`] turns a [`Value`](crate::value::Value) into elements
//! against an expected wire type; the [`Decoder`] walks a parsed response
//! element back into a `Value`. Both consult the [`Registry`](crate::registry::Registry)
//! for every type decision.
//!
//! # Wire conventions
//!
//! - Arrays are flattened into repeated sibling elements.
//! - Data records always carry `xsi:type`.
//! - Managed object references carry a plain `type` attribute.
//! - Primitives in an `anyType` slot carry `xsi:type="xsd:..."`.

mod decode;
mod encode;


pub use decode::Decoder;
pub use encode::Encoder;

use crate::registry::{names, TypeDescriptor, TypeKind};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// `xsi:type` value for a descriptor.
pub(crate) fn wire_name(desc: &TypeDescriptor) -> String {
    match desc.kind {
        TypeKind::Primitive(_) | TypeKind::Binary | TypeKind::AnyType => {
            names::qualified(&desc.name)
        }
        _ => desc.name.clone(),
    }
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// ISO-8601 with an offset, or a bare local timestamp taken as UTC.
pub(crate) fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "INF" } else { "-INF" }.to_string()
    } else {
        f.to_string()
    }
}

/// xsd:double lexical forms only; `inf`, `nan` and friends are rejected.
pub(crate) fn parse_float(text: &str) -> Option<f64> {
    match text {
        "NaN" => Some(f64::NAN),
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        other if other.bytes().all(|b| b.is_ascii_digit() || b"+-.eE".contains(&b)) => {
            other.parse().ok()
        }
        _ => None,
    }
}
