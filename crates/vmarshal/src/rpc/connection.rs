// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Connection: the session object shared by every reference it hands out.

use crate::config::{ConnectionConfig, DEFAULT_REVISION};
use crate::error::{Error, Result};
use crate::registry::{MethodDescriptor, Registry};
use crate::rpc::{Invoker, ServiceContent, Transport};
use crate::value::{Dispatch, ManagedObjectRef, Params, Value};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

const SERVICE_INSTANCE: &str = "ServiceInstance";

/// A session with one endpoint.
///
/// Created behind an `Arc`; references decoded from its responses hold it
/// weakly and dispatch their calls back through it.
///
/// # Example
///
/// ```rust,no_run
/// use vmarshal::{load_schema, Connection, ConnectionConfig, ReplayTransport};
/// use std::sync::Arc;
///
/// # fn example(schema: &str) -> vmarshal::Result<()> {
/// let registry = Arc::new(load_schema(schema)?);
/// let config = ConnectionConfig::default().revision("7.0").login(false);
/// let conn = Connection::new(config, registry, ReplayTransport::new());
///
/// let vm = conn.moref("VirtualMachine", "vm-42")?;
/// let task = vm.call("PowerOnVM_Task", &Default::default())?;
/// # Ok(())
/// # }
/// ```
pub struct Connection<T: Transport + 'static> {
    config: ConnectionConfig,
    registry: Arc<Registry>,
    transport: T,
    revision: RwLock<String>,
    service_content: RwLock<Option<Arc<ServiceContent>>>,
    this: Weak<Connection<T>>,
}

impl<T: Transport + 'static> Connection<T> {
    /// Create a connection without talking to the endpoint.
    pub fn new(config: ConnectionConfig, registry: Arc<Registry>, transport: T) -> Arc<Self> {
        let revision = config
            .revision
            .clone()
            .unwrap_or_else(|| DEFAULT_REVISION.to_string());
        Arc::new_cyclic(|this| Self {
            config,
            registry,
            transport,
            revision: RwLock::new(revision),
            service_content: RwLock::new(None),
            this: this.clone(),
        })
    }

    /// Create a connection, negotiate the revision and log in.
    ///
    /// Without a configured revision the service content is fetched under
    /// the default revision and `about.apiVersion` is adopted.
    pub fn connect(
        config: ConnectionConfig,
        registry: Arc<Registry>,
        transport: T,
    ) -> Result<Arc<Self>> {
        let conn = Self::new(config, registry, transport);

        if conn.config.revision.is_none() {
            let content = conn.service_content()?;
            if let Some(version) = content.api_version.as_deref() {
                log::debug!("negotiated revision {}", version);
                conn.set_revision(version);
            }
        }

        if conn.config.login {
            conn.login(&conn.config.user, &conn.config.password)?;
        }
        Ok(conn)
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }

    /// Revision currently spoken.
    pub fn revision(&self) -> String {
        self.revision.read().clone()
    }

    pub fn set_revision(&self, revision: impl Into<String>) {
        *self.revision.write() = revision.into();
    }

    fn session(&self) -> Weak<dyn Dispatch> {
        self.this.clone()
    }

    /// Invoker bound to this connection's registry, transport and revision.
    pub fn invoker(&self) -> Invoker<'_> {
        Invoker::new(
            &self.registry,
            &self.transport,
            &self.config.namespace,
            self.revision(),
        )
        .with_session(self.session())
        .with_trace(self.config.trace_calls)
    }

    /// Invoke an already-resolved method descriptor.
    pub fn invoke(
        &self,
        method: &MethodDescriptor,
        target: &ManagedObjectRef,
        params: &Params,
    ) -> Result<Option<Value>> {
        self.invoker().call(method, target, params)
    }

    /// Invoke `method` on `target`, looking the descriptor up by name.
    pub fn call(
        &self,
        target: &ManagedObjectRef,
        method: &str,
        params: &Params,
    ) -> Result<Option<Value>> {
        let desc = self.registry.find_method(target.type_name(), method)?;
        self.invoke(desc, target, params)
    }

    /// Reference to a known object, bound to this connection.
    pub fn moref(&self, type_name: &str, id: &str) -> Result<ManagedObjectRef> {
        let desc = self.registry.resolve(type_name)?;
        if !desc.is_managed_object() {
            return Err(Error::UnexpectedType {
                element: id.to_string(),
                type_name: desc.name.clone(),
            });
        }
        Ok(ManagedObjectRef::new(desc.name.clone(), id).bind(self.session()))
    }

    pub fn service_instance(&self) -> Result<ManagedObjectRef> {
        self.moref(SERVICE_INSTANCE, SERVICE_INSTANCE)
    }

    /// Service content, fetched on first use and cached.
    pub fn service_content(&self) -> Result<Arc<ServiceContent>> {
        if let Some(content) = self.service_content.read().as_ref() {
            return Ok(Arc::clone(content));
        }

        let si = self.service_instance()?;
        let record = match self.call(&si, "RetrieveServiceContent", &Params::new())? {
            Some(Value::Record(record)) => record,
            other => {
                return Err(Error::MalformedResponse(format!(
                    "RetrieveServiceContent returned {}",
                    other.as_ref().map_or("nothing", Value::tag)
                )))
            }
        };
        let content = Arc::new(ServiceContent::from_record(record)?);

        let mut slot = self.service_content.write();
        Ok(Arc::clone(slot.get_or_insert(content)))
    }

    pub fn root_folder(&self) -> Result<ManagedObjectRef> {
        Ok(self.service_content()?.root_folder.clone())
    }

    pub fn property_collector(&self) -> Result<ManagedObjectRef> {
        Ok(self.service_content()?.property_collector.clone())
    }

    pub fn search_index(&self) -> Result<ManagedObjectRef> {
        Ok(self.service_content()?.search_index.clone())
    }

    pub fn session_manager(&self) -> Result<ManagedObjectRef> {
        self.service_content()?
            .session_manager
            .clone()
            .ok_or_else(|| Error::MissingProperty {
                type_name: "ServiceContent".to_string(),
                property: "sessionManager".to_string(),
            })
    }

    /// `SessionManager.Login`; returns the decoded user session.
    pub fn login(&self, user: &str, password: &str) -> Result<Option<Value>> {
        let session_manager = self.session_manager()?;
        let mut params = Params::new();
        params.insert("userName".to_string(), user.into());
        params.insert("password".to_string(), password.into());

        log::debug!("logging in as {}", user);
        self.call(&session_manager, "Login", &params)
    }
}

impl<T: Transport + 'static> Dispatch for Connection<T> {
    fn dispatch(
        &self,
        target: &ManagedObjectRef,
        method: &str,
        params: &Params,
    ) -> Result<Option<Value>> {
        self.call(target, method, params)
    }
}
