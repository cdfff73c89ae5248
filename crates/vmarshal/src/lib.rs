// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # vmarshal - schema-driven SOAP marshalling
//!
//! Typed RPC marshalling for inventory-management SOAP endpoints. A schema
//! describes data records, managed objects, enumerations and remote methods;
//! the engine encodes dynamic [`Value`]s into request bodies, decodes
//! response elements back into values and turns server faults into typed
//! errors.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vmarshal::{load_schema, Connection, ConnectionConfig, Params, ReplayTransport, Result};
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let registry = Arc::new(load_schema(&std::fs::read_to_string("vim.yaml").unwrap())?);
//!     let transport = ReplayTransport::new();
//!
//!     let conn = Connection::connect(ConnectionConfig::default(), registry, transport)?;
//!     let root = conn.root_folder()?;
//!
//!     let mut params = Params::new();
//!     params.insert("newName".into(), "Lab".into());
//!     root.call("Rename", &params)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |  Connection: service content, login, revision negotiation           |
//! +---------------------------------------------------------------------+
//! |  Invoker: request building, fault detection, result decoding        |
//! +---------------------------------+-----------------------------------+
//! |  Encoder (Value -> Element)     |  Decoder (roxmltree -> Value)     |
//! +---------------------------------+-----------------------------------+
//! |  Registry: descriptors, subtyping, method lookup (YAML/JSON schema) |
//! +---------------------------------------------------------------------+
//! |  Transport (trait): HTTP, TLS, cookies live outside this crate      |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Registry`] | Immutable set of type descriptors |
//! | [`Value`] | Tagged dynamic value moved between wire and memory |
//! | [`Encoder`] / [`Decoder`] | Schema-driven XML codecs |
//! | [`Invoker`] | One remote call: request, transport, response |
//! | [`Connection`] | Session with cached service content |
//!
//! ## Modules Overview
//!
//! - [`registry`] - descriptors and schema loading
//! - [`value`] - dynamic values, records and references
//! - [`codec`] - encoder and decoder
//! - [`rpc`] - transport seam, invoker, faults and connection
//! - [`config`] - connection settings

pub mod codec;
pub mod config;
pub mod error;
pub mod registry;
pub mod rpc;
pub mod value;
pub mod xml;

pub use codec::{Decoder, Encoder};
pub use config::ConnectionConfig;
pub use error::{BoxError, Error, Result};
pub use registry::{load_schema, Registry, SchemaError, SchemaLoader, TypeDescriptor, TypeKind};
pub use rpc::{Connection, Fault, Invoker, ReplayTransport, ServiceContent, Transport};
pub use value::{DataRecord, ManagedObjectRef, Params, Value};
pub use xml::{Element, XmlWriter};

#[cfg(test)]
pub(crate) mod testing {
    use crate::registry::{load_schema, Registry};
    use std::sync::Arc;

    /// Inventory schema shared with the integration tests.
    pub const SCHEMA: &str = include_str!("../tests/fixtures/vim.yaml");

    pub fn registry() -> Arc<Registry> {
        Arc::new(load_schema(SCHEMA).expect("test schema is valid"))
    }
}
