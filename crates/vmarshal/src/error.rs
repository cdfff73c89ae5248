// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for marshalling and RPC operations.
//!
//! Every failure is local to one call: nothing is retried and no partial
//! result is returned. Callers branch on the variant; a server-side fault
//! arrives as [`Error::RemoteFault`] and can be matched on its payload type.

use crate::registry::SchemaError;
use crate::rpc::Fault;
use thiserror::Error;

/// Opaque error raised by a transport implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for marshalling and RPC operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding, decoding or invoking.
#[derive(Debug, Error)]
pub enum Error {
    /// A type name the registry cannot resolve.
    #[error("no such type {0:?}")]
    UnknownType(String),

    /// A resolved type that cannot be used in this position.
    #[error("unexpected type {type_name:?} for <{element}>")]
    UnexpectedType { element: String, type_name: String },

    /// A value whose concrete type is not a subtype of the expected type.
    #[error("expected {expected}, got {found} for field {field:?}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// A scalar was supplied where the descriptor declares an array.
    #[error("expected array of {expected} for field {field:?}, got scalar")]
    ArrayExpected { field: String, expected: String },

    /// An array was supplied where the descriptor declares a scalar.
    #[error("expected {expected} for field {field:?}, got array")]
    UnexpectedArray { field: String, expected: String },

    /// A non-optional method parameter was not supplied.
    #[error("missing required parameter {0}")]
    MissingRequiredParameter(String),

    /// Primitive text that does not parse as its declared kind.
    #[error("malformed {type_name} value {text:?} in <{element}>")]
    MalformedValue {
        element: String,
        type_name: String,
        text: String,
    },

    /// An element declared as anyType with no concrete type on the wire.
    #[error("attempted to deserialize an AnyType in <{0}>")]
    UndecodableAnyType(String),

    /// A value with no wire representation in this position.
    #[error("cannot encode {found} for field {field:?}")]
    UnencodableValue { field: String, found: String },

    /// A managed object reference element without its `type` attribute.
    #[error("managed object reference <{0}> has no type attribute")]
    MissingTypeAttribute(String),

    /// The server answered with an application-level fault.
    #[error("{0}")]
    RemoteFault(Fault),

    /// The server answered with a fault that carries no typed payload.
    #[error("{code}: {message}")]
    ProtocolFault { code: String, message: String },

    /// The response document does not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Failure inside the transport, propagated unchanged.
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    /// The response is not well-formed XML.
    #[error("xml parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// No method of that name on the managed object type or its ancestors.
    #[error("no method {method} on {type_name}")]
    UnknownMethod { type_name: String, method: String },

    /// A managed object reference whose connection is gone or was never set.
    #[error("managed object {0} is not bound to a live connection")]
    Detached(String),

    /// A data record lacks a property the caller requires.
    #[error("{type_name} has no value for property {property}")]
    MissingProperty { type_name: String, property: String },

    /// Schema loading or registry construction failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl Error {
    /// Build a type mismatch for `field`.
    pub fn mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// The decoded fault, if this is a remote fault.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::RemoteFault(fault) => Some(fault),
            _ => None,
        }
    }
}
