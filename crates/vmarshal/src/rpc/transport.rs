// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transport seam.
//!
//! HTTP, TLS, cookies and timeouts live behind [`Transport`]; the core only
//! hands over a namespace and a body callback and gets a response document
//! back.

use crate::error::BoxError;
use crate::xml::XmlWriter;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Sends one request and returns the raw response document.
pub trait Transport: Send + Sync {
    /// `namespace` is the versioned action namespace (`urn:vim25/7.0`);
    /// `body` writes the request element into the envelope body.
    fn send(&self, namespace: &str, body: &dyn Fn(&mut XmlWriter)) -> Result<String, BoxError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, namespace: &str, body: &dyn Fn(&mut XmlWriter)) -> Result<String, BoxError> {
        (**self).send(namespace, body)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, namespace: &str, body: &dyn Fn(&mut XmlWriter)) -> Result<String, BoxError> {
        (**self).send(namespace, body)
    }
}

/// A request captured by [`ReplayTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub namespace: String,
    /// Serialized request element (without envelope).
    pub body: String,
}

/// In-memory transport that replays scripted responses in order.
///
/// Every request is recorded; running out of responses is a transport error.
#[derive(Debug, Default)]
pub struct ReplayTransport {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ReplayTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: queue a response.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.push_response(response);
        self
    }

    /// Queue a response.
    pub fn push_response(&self, response: impl Into<String>) {
        self.responses.lock().push_back(response.into());
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Most recent request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }

    /// Responses not consumed yet.
    pub fn pending_responses(&self) -> usize {
        self.responses.lock().len()
    }
}

impl Transport for ReplayTransport {
    fn send(&self, namespace: &str, body: &dyn Fn(&mut XmlWriter)) -> Result<String, BoxError> {
        let mut writer = XmlWriter::new();
        body(&mut writer);
        self.requests.lock().push(RecordedRequest {
            namespace: namespace.to_string(),
            body: writer.into_string(),
        });

        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| "no scripted response left".into())
    }
}
