// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Connection settings.
//!
//! # Example YAML
//!
//! ```yaml
//! namespace: urn:vim25
//! revision: "7.0"        # omit to negotiate from about.apiVersion
//! user: administrator@vsphere.local
//! password: secret
//! login: true
//! trace_calls: false
//! ```

use serde::Deserialize;

/// Request element namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "urn:vim25";
/// Revision spoken before negotiation completes.
pub const DEFAULT_REVISION: &str = "4.0";
/// Non-empty value turns call tracing on by default.
pub const TRACE_ENV: &str = "VMARSHAL_TRACE_CALLS";

/// Settings for a [`Connection`](crate::rpc::Connection).
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Namespace of request elements; the versioned action is `{namespace}/{revision}`.
    pub namespace: String,
    /// Fixed revision. `None` negotiates it from the service content.
    pub revision: Option<String>,
    pub user: String,
    pub password: String,
    /// Log in during [`Connection::connect`](crate::rpc::Connection::connect).
    pub login: bool,
    /// Log every call's parameters, result and elapsed time.
    pub trace_calls: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            revision: None,
            user: "root".to_string(),
            password: String::new(),
            login: true,
            trace_calls: std::env::var(TRACE_ENV).is_ok_and(|v| !v.is_empty()),
        }
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("namespace", &self.namespace)
            .field("revision", &self.revision)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("login", &self.login)
            .field("trace_calls", &self.trace_calls)
            .finish()
    }
}

impl ConnectionConfig {
    /// Parse settings from YAML; missing keys take their defaults.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Pin the revision and skip negotiation.
    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    pub fn login(mut self, login: bool) -> Self {
        self.login = login;
        self
    }

    pub fn trace_calls(mut self, trace: bool) -> Self {
        self.trace_calls = trace;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig::default();
        assert_eq!(config.namespace, "urn:vim25");
        assert_eq!(config.revision, None);
        assert_eq!(config.user, "root");
        assert!(config.password.is_empty());
        assert!(config.login);
    }

    #[test]
    fn test_builder() {
        let config = ConnectionConfig::default()
            .revision("6.7")
            .credentials("admin", "secret")
            .login(false)
            .trace_calls(true);
        assert_eq!(config.revision.as_deref(), Some("6.7"));
        assert_eq!(config.user, "admin");
        assert!(!config.login);
        assert!(config.trace_calls);
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = ConnectionConfig::from_yaml("revision: \"7.0\"\nuser: admin\n").expect("yaml");
        assert_eq!(config.revision.as_deref(), Some("7.0"));
        assert_eq!(config.user, "admin");
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert!(config.login);
    }

    #[test]
    fn test_from_yaml_rejects_bad_types() {
        assert!(ConnectionConfig::from_yaml("login: maybe\n").is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ConnectionConfig::default().credentials("admin", "hunter2");
        let shown = format!("{:?}", config);
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("admin"));
    }
}
