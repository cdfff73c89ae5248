// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Remote method invocation.
//!
//! One call: encode the request element, hand it to the transport under
//! the versioned namespace, then either raise the returned fault or decode
//! the result elements.

use crate::codec::{Decoder, Encoder};
use crate::error::{Error, Result};
use crate::registry::names::{MANAGED_OBJECT, METHOD_FAULT};
use crate::registry::{MethodDescriptor, Registry, ResultDescriptor};
use crate::rpc::{Fault, Transport};
use crate::value::{Dispatch, ManagedObjectRef, Params, Value};
use crate::xml::{Element, XmlWriter};
use roxmltree::{Document, Node};
use std::sync::Weak;
use std::time::Instant;

/// Marshals a single remote call.
pub struct Invoker<'a> {
    registry: &'a Registry,
    transport: &'a dyn Transport,
    namespace: &'a str,
    revision: String,
    session: Option<Weak<dyn Dispatch>>,
    trace: bool,
}

impl<'a> Invoker<'a> {
    pub fn new(
        registry: &'a Registry,
        transport: &'a dyn Transport,
        namespace: &'a str,
        revision: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            transport,
            namespace,
            revision: revision.into(),
            session: None,
            trace: false,
        }
    }

    /// Bind references decoded from responses to `session`.
    pub fn with_session(mut self, session: Weak<dyn Dispatch>) -> Self {
        self.session = Some(session);
        self
    }

    /// Log parameters, result and elapsed time of each call at debug level.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Versioned namespace the request is submitted under.
    pub fn action_namespace(&self) -> String {
        format!("{}/{}", self.namespace, self.revision)
    }

    /// Invoke `method` on `target`.
    ///
    /// Returns `None` for methods without a declared result.
    pub fn call(
        &self,
        method: &MethodDescriptor,
        target: &ManagedObjectRef,
        params: &Params,
    ) -> Result<Option<Value>> {
        let request = self.build_request(method, target, params)?;

        let started = Instant::now();
        if self.trace {
            log::debug!("request {} on {}: {:?}", method.name, target, params);
        }

        let response = self
            .transport
            .send(&self.action_namespace(), &|w: &mut XmlWriter| {
                w.write_element(&request)
            })
            .map_err(Error::Transport)?;
        let result = self.parse_response(&response, method.result.as_ref());

        if self.trace {
            log::debug!(
                "response {} (in {:.3} s): {:?}",
                method.name,
                started.elapsed().as_secs_f64(),
                result
            );
        }
        result
    }

    /// Build the request element for `method`.
    ///
    /// Fails with `MissingRequiredParameter` before anything is sent.
    pub fn build_request(
        &self,
        method: &MethodDescriptor,
        target: &ManagedObjectRef,
        params: &Params,
    ) -> Result<Element> {
        let encoder = Encoder::new(self.registry);
        let mut request = Element::new(method.name.as_str()).with_attr("xmlns", self.namespace);
        request.push_child(encoder.encode_reference("_this", MANAGED_OBJECT, target)?);

        for param in &method.parameters {
            match params.get(&param.name) {
                Some(value) => {
                    for el in encoder.encode(&param.name, &param.wire_type, param.is_array, value)? {
                        request.push_child(el);
                    }
                }
                None if param.is_optional => {}
                None => return Err(Error::MissingRequiredParameter(param.name.clone())),
            }
        }
        Ok(request)
    }

    /// Turn a response document into a result or a fault.
    ///
    /// Accepts either the bare response element or a full SOAP envelope.
    pub fn parse_response(
        &self,
        xml: &str,
        result: Option<&ResultDescriptor>,
    ) -> Result<Option<Value>> {
        let doc = Document::parse(xml)?;
        let payload = unwrap_envelope(doc.root_element())?;

        if let Some(code) = child(payload, "faultcode") {
            return Err(self.fault(payload, text(code)));
        }

        let Some(result) = result else {
            return Ok(None);
        };
        let decoder = self.decoder();
        let values = payload
            .children()
            .filter(Node::is_element)
            .map(|el| decoder.decode(el, result.decode_type()))
            .collect::<Result<Vec<_>>>()?;

        if result.is_array {
            Ok(Some(Value::Sequence(values)))
        } else {
            Ok(values.into_iter().next())
        }
    }

    fn fault(&self, node: Node<'_, '_>, code: &str) -> Error {
        let message = child(node, "faultstring").map(text).unwrap_or_default();
        let Some(detail) = child(node, "detail").and_then(|d| d.first_element_child()) else {
            return Error::ProtocolFault {
                code: code.to_string(),
                message: message.to_string(),
            };
        };

        match self.decoder().decode(detail, METHOD_FAULT) {
            Ok(Value::Record(payload)) => {
                let fault = Fault::new(message, Some(payload));
                log::warn!("remote fault: {}", fault);
                Error::RemoteFault(fault)
            }
            Ok(other) => Error::MalformedResponse(format!(
                "fault detail decoded as {}, not a record",
                other.tag()
            )),
            Err(e) => e,
        }
    }

    fn decoder(&self) -> Decoder<'a> {
        let decoder = Decoder::new(self.registry);
        match &self.session {
            Some(session) => decoder.with_session(session.clone()),
            None => decoder,
        }
    }
}

/// Descend `Envelope/Body` to the payload element, if wrapped.
fn unwrap_envelope<'a, 'input>(root: Node<'a, 'input>) -> Result<Node<'a, 'input>> {
    if root.tag_name().name() != "Envelope" {
        return Ok(root);
    }
    child(root, "Body")
        .ok_or_else(|| Error::MalformedResponse("envelope has no Body".into()))?
        .first_element_child()
        .ok_or_else(|| Error::MalformedResponse("empty Body".into()))
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().map(str::trim).unwrap_or("")
}
