// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed remote calls over SOAP.
//!
//! # Overview
//!
//! - **Invoker** builds the request element, sends it and decodes the reply
//! - **Transport** is the seam to whatever carries the bytes
//! - **Connection** owns the session: revision, service content, login
//!
//! # Request shape
//!
//! For `Rename(newName: string)` on `Folder("group-d1")`:
//!
//! ```xml
//! <Rename xmlns="urn:vim25">
//!   <_this type="Folder">group-d1</_this>
//!   <newName>Lab</newName>
//! </Rename>
//! ```
//!
//! submitted under the action namespace `urn:vim25/{revision}`.
//!
//! # Faults
//!
//! A response carrying `faultcode` is raised as [`Error::RemoteFault`](crate::Error::RemoteFault)
//! when its `detail` holds a typed payload, and as
//! [`Error::ProtocolFault`](crate::Error::ProtocolFault) otherwise.

mod connection;
mod fault;
mod invoker;
mod service;
mod transport;

pub use connection::Connection;
pub use fault::Fault;
pub use invoker::Invoker;
pub use service::ServiceContent;
pub use transport::{RecordedRequest, ReplayTransport, Transport};
