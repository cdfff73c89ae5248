// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Minimal XML element tree and writer for request bodies.
//!
//! Responses are parsed with `roxmltree`; this module only covers the
//! outgoing direction: the encoder produces [`Element`]s and the transport
//! serializes them through an [`XmlWriter`].

use crate::registry::names::{NS_SOAPENV, NS_XSD, NS_XSI};
use std::fmt::Write as _;

/// An outgoing XML element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    /// Attributes in emission order.
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set an attribute, replacing an existing one of the same name.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Streaming XML serializer.
#[derive(Debug, Default)]
pub struct XmlWriter {
    buf: String,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize an element and its subtree.
    pub fn write_element(&mut self, element: &Element) {
        self.buf.push('<');
        self.buf.push_str(&element.name);
        for (name, value) in &element.attributes {
            let _ = write!(self.buf, " {}=\"{}\"", name, escape_attr(value));
        }

        if element.text.is_none() && element.children.is_empty() {
            self.buf.push_str("/>");
            return;
        }

        self.buf.push('>');
        if let Some(text) = &element.text {
            self.buf.push_str(&escape_text(text));
        }
        for child in &element.children {
            self.write_element(child);
        }
        let _ = write!(self.buf, "</{}>", element.name);
    }

    /// Append raw, already-escaped markup.
    pub fn write_raw(&mut self, markup: &str) {
        self.buf.push_str(markup);
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Wrap a body produced by `body` in a SOAP 1.1 envelope.
pub fn soap_envelope(body: &dyn Fn(&mut XmlWriter)) -> String {
    let mut writer = XmlWriter::new();
    writer.write_raw(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = write!(
        writer.buf,
        r#"<soapenv:Envelope xmlns:xsd="{}" xmlns:xsi="{}" xmlns:soapenv="{}"><soapenv:Body>"#,
        NS_XSD, NS_XSI, NS_SOAPENV
    );
    body(&mut writer);
    writer.write_raw("</soapenv:Body></soapenv:Envelope>");
    writer.into_string()
}

/// True for characters allowed by the XML 1.0 `Char` production.
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

// Parsers normalize raw `\r` in text and all whitespace in attribute values,
// so those are written as character references.
fn escape(s: &str, attr: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            '"' if attr => out.push_str("&quot;"),
            '\t' if attr => out.push_str("&#9;"),
            '\n' if attr => out.push_str("&#10;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_text(s: &str) -> String {
    escape(s, false)
}

fn escape_attr(s: &str) -> String {
    escape(s, true)
}
