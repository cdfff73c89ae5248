// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Server-side faults.

use crate::registry::Registry;
use crate::value::DataRecord;
use std::fmt;

/// An application-level fault returned by the server.
///
/// The payload is the decoded `detail` record, a subtype of `MethodFault`.
/// Callers branch on [`Fault::payload_type`] or [`Fault::is_a`].
#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    message: String,
    payload: Option<DataRecord>,
}

impl Fault {
    pub fn new(message: impl Into<String>, payload: Option<DataRecord>) -> Self {
        Self {
            message: message.into(),
            payload,
        }
    }

    /// The `faultstring` text.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn payload(&self) -> Option<&DataRecord> {
        self.payload.as_ref()
    }

    /// Concrete fault type name (`InvalidName`, `NotAuthenticated`, ...).
    pub fn payload_type(&self) -> Option<&str> {
        self.payload.as_ref().map(DataRecord::type_name)
    }

    /// True when the payload type is `fault_type` or one of its subtypes.
    pub fn is_a(&self, registry: &Registry, fault_type: &str) -> bool {
        self.payload_type()
            .is_some_and(|t| registry.is_subtype(t, fault_type))
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload_type() {
            Some(t) => write!(f, "{}: {}", t, self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_display_includes_payload_type() {
        let fault = Fault::new(
            "The name 'a/b' is invalid",
            Some(DataRecord::new("InvalidName").with("name", "a/b")),
        );
        assert_eq!(fault.to_string(), "InvalidName: The name 'a/b' is invalid");
        assert_eq!(Fault::new("plain", None).to_string(), "plain");
    }

    #[test]
    fn test_is_a_follows_hierarchy() {
        let registry = testing::registry();
        let fault = Fault::new("bad", Some(DataRecord::new("InvalidName")));
        assert!(fault.is_a(&registry, "InvalidName"));
        assert!(fault.is_a(&registry, "MethodFault"));
        assert!(!fault.is_a(&registry, "InvalidLogin"));
        assert!(!Fault::new("bad", None).is_a(&registry, "MethodFault"));
    }
}
