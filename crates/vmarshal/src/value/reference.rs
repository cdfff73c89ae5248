// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Managed object references.

use crate::error::{Error, Result};
use crate::value::{Params, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// Something that can dispatch a method call on a managed object.
///
/// Implemented by the connection; references hold it weakly so a dropped
/// connection is never kept alive by values the caller still owns.
pub trait Dispatch: Send + Sync {
    fn dispatch(
        &self,
        target: &ManagedObjectRef,
        method: &str,
        params: &Params,
    ) -> Result<Option<Value>>;
}

/// Typed identifier of a remote object.
///
/// Equality and hashing only consider `(type_name, id)`.
#[derive(Clone)]
pub struct ManagedObjectRef {
    type_name: String,
    id: String,
    session: Option<Weak<dyn Dispatch>>,
}

impl ManagedObjectRef {
    /// Create an unbound reference.
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
            session: None,
        }
    }

    /// Bind to the connection that dispatches calls on this reference.
    pub fn bind(mut self, session: Weak<dyn Dispatch>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True while the bound connection is alive.
    pub fn is_bound(&self) -> bool {
        self.session().is_some()
    }

    fn session(&self) -> Option<Arc<dyn Dispatch>> {
        self.session.as_ref().and_then(Weak::upgrade)
    }

    /// Invoke `method` on this object through its connection.
    pub fn call(&self, method: &str, params: &Params) -> Result<Option<Value>> {
        let session = self
            .session()
            .ok_or_else(|| Error::Detached(self.to_string()))?;
        session.dispatch(self, method, params)
    }
}

impl PartialEq for ManagedObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.id == other.id
    }
}

impl Eq for ManagedObjectRef {}

impl Hash for ManagedObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Debug for ManagedObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedObjectRef")
            .field("type_name", &self.type_name)
            .field("id", &self.id)
            .field("bound", &self.session.is_some())
            .finish()
    }
}

impl fmt::Display for ManagedObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.type_name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashSet;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, String)>>,
    }

    impl Dispatch for Recorder {
        fn dispatch(
            &self,
            target: &ManagedObjectRef,
            method: &str,
            _params: &Params,
        ) -> Result<Option<Value>> {
            self.calls
                .lock()
                .push((target.id().to_string(), method.to_string()));
            Ok(Some(Value::from(true)))
        }
    }

    #[test]
    fn test_equality_ignores_binding() {
        let recorder: Arc<dyn Dispatch> = Arc::new(Recorder::default());
        let bound = ManagedObjectRef::new("Folder", "group-d1").bind(Arc::downgrade(&recorder));
        let unbound = ManagedObjectRef::new("Folder", "group-d1");
        assert_eq!(bound, unbound);

        let mut set = HashSet::new();
        set.insert(bound);
        assert!(set.contains(&unbound));
        assert!(!set.contains(&ManagedObjectRef::new("Datacenter", "group-d1")));
    }

    #[test]
    fn test_call_dispatches_through_session() {
        let recorder = Arc::new(Recorder::default());
        let session: Arc<dyn Dispatch> = recorder.clone();
        let vm = ManagedObjectRef::new("VirtualMachine", "vm-42").bind(Arc::downgrade(&session));

        let result = vm.call("PowerOnVM_Task", &Params::new()).expect("call");
        assert_eq!(result.and_then(|v| v.as_bool()), Some(true));
        assert_eq!(
            recorder.calls.lock().as_slice(),
            [("vm-42".to_string(), "PowerOnVM_Task".to_string())]
        );
    }

    #[test]
    fn test_detached_after_drop() {
        let session: Arc<dyn Dispatch> = Arc::new(Recorder::default());
        let vm = ManagedObjectRef::new("VirtualMachine", "vm-42").bind(Arc::downgrade(&session));
        assert!(vm.is_bound());
        drop(session);

        assert!(!vm.is_bound());
        assert!(matches!(
            vm.call("PowerOnVM_Task", &Params::new()),
            Err(Error::Detached(_))
        ));
        assert!(matches!(
            ManagedObjectRef::new("Folder", "f").call("Rename", &Params::new()),
            Err(Error::Detached(_))
        ));
    }

    #[test]
    fn test_display() {
        let r = ManagedObjectRef::new("Folder", "group-d1");
        assert_eq!(r.to_string(), "Folder(\"group-d1\")");
    }
}
