// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// End-to-end session tests against an in-process fake endpoint.
//
// The endpoint receives the full SOAP envelope, parses it with roxmltree,
// answers a handful of methods and keeps inventory state between calls.

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use vmarshal::registry::names::{NS_SOAPENV, NS_XSD, NS_XSI};
use vmarshal::xml::soap_envelope;
use vmarshal::{
    BoxError, Connection, ConnectionConfig, Error, Params, Registry, SchemaLoader, Transport,
    Value, XmlWriter,
};

const SCHEMA_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/vim.yaml");

fn registry() -> Arc<Registry> {
    Arc::new(SchemaLoader::load_from_file(SCHEMA_PATH).expect("fixture schema"))
}

fn respond(body: &str) -> String {
    format!(
        r#"<soapenv:Envelope xmlns:soapenv="{}" xmlns:xsd="{}" xmlns:xsi="{}"><soapenv:Body>{}</soapenv:Body></soapenv:Envelope>"#,
        NS_SOAPENV, NS_XSD, NS_XSI, body
    )
}

fn fault(message: &str, payload_type: &str, inner: &str) -> String {
    respond(&format!(
        r#"<soapenv:Fault><faultcode>ServerFaultCode</faultcode><faultstring>{}</faultstring><detail><{t}Fault xmlns="urn:vim25" xsi:type="{t}">{}</{t}Fault></detail></soapenv:Fault>"#,
        message,
        inner,
        t = payload_type
    ))
}

#[derive(Default)]
struct FakeEndpoint {
    folder_name: Mutex<String>,
    namespaces: Mutex<Vec<String>>,
}

impl FakeEndpoint {
    fn handle(&self, method: &str, args: &[(String, String)]) -> String {
        let arg = |name: &str| {
            args.iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
                .unwrap_or_default()
        };

        match method {
            "RetrieveServiceContent" => respond(
                r#"<RetrieveServiceContentResponse xmlns="urn:vim25"><returnval>
                    <rootFolder type="Folder">group-d1</rootFolder>
                    <propertyCollector type="PropertyCollector">propertyCollector</propertyCollector>
                    <searchIndex type="SearchIndex">SearchIndex</searchIndex>
                    <sessionManager type="SessionManager">SessionManager</sessionManager>
                    <about><name>fake</name><fullName>fake endpoint</fullName><apiVersion>8.0.1.0</apiVersion></about>
                </returnval></RetrieveServiceContentResponse>"#,
            ),
            "Login" if arg("password") == "secret" => respond(&format!(
                r#"<LoginResponse xmlns="urn:vim25"><returnval><key>s-1</key><userName>{}</userName><loginTime>2025-01-01T00:00:00Z</loginTime></returnval></LoginResponse>"#,
                arg("userName")
            )),
            "Login" => fault("incorrect user name or password", "InvalidLogin", ""),
            "Rename" if arg("newName").contains('/') => fault(
                "name contains a slash",
                "InvalidName",
                &format!("<name>{}</name>", arg("newName")),
            ),
            "Rename" => {
                *self.folder_name.lock() = arg("newName").to_string();
                respond(r#"<RenameResponse xmlns="urn:vim25"/>"#)
            }
            "CurrentTime" => respond(
                r#"<CurrentTimeResponse xmlns="urn:vim25"><returnval>2025-01-01T08:30:00.5Z</returnval></CurrentTimeResponse>"#,
            ),
            other => respond(&format!(
                "<soapenv:Fault><faultcode>ServerFaultCode</faultcode><faultstring>unknown method {}</faultstring></soapenv:Fault>",
                other
            )),
        }
    }
}

impl Transport for FakeEndpoint {
    fn send(&self, namespace: &str, body: &dyn Fn(&mut XmlWriter)) -> Result<String, BoxError> {
        self.namespaces.lock().push(namespace.to_string());

        let request = soap_envelope(body);
        let doc = roxmltree::Document::parse(&request)?;
        let call = doc
            .descendants()
            .find(|n| n.has_tag_name((NS_SOAPENV, "Body")))
            .and_then(|b| b.first_element_child())
            .ok_or("request has no body element")?;

        let args: Vec<(String, String)> = call
            .children()
            .filter(|n| n.is_element())
            .map(|n| {
                (
                    n.tag_name().name().to_string(),
                    n.text().unwrap_or_default().to_string(),
                )
            })
            .collect();
        Ok(self.handle(call.tag_name().name(), &args))
    }
}

type FakeConnection = Connection<Arc<FakeEndpoint>>;

fn connect(endpoint: &Arc<FakeEndpoint>, password: &str) -> vmarshal::Result<Arc<FakeConnection>> {
    let config = ConnectionConfig::default()
        .credentials("admin", password)
        .trace_calls(false);
    Connection::connect(config, registry(), Arc::clone(endpoint))
}

#[test]
fn test_full_session() {
    let endpoint = Arc::new(FakeEndpoint::default());
    let conn = connect(&endpoint, "secret").expect("connect");
    assert_eq!(conn.revision(), "8.0.1.0");

    let root = conn.root_folder().expect("root folder");
    let mut params = Params::new();
    params.insert("newName".into(), "Lab".into());
    assert_eq!(root.call("Rename", &params).expect("rename"), None);
    assert_eq!(*endpoint.folder_name.lock(), "Lab");

    let si = conn.service_instance().expect("service instance");
    let now = si.call("CurrentTime", &Params::new()).expect("time");
    let now = now.as_ref().and_then(Value::as_datetime).expect("dateTime");
    assert_eq!(now.to_rfc3339(), "2025-01-01T08:30:00.500+00:00");

    let namespaces = endpoint.namespaces.lock().clone();
    assert_eq!(namespaces.first().map(String::as_str), Some("urn:vim25/4.0"));
    assert!(namespaces[1..].iter().all(|ns| ns == "urn:vim25/8.0.1.0"));
}

#[test]
fn test_remote_fault_is_typed() {
    let endpoint = Arc::new(FakeEndpoint::default());
    let conn = connect(&endpoint, "secret").expect("connect");
    let root = conn.root_folder().expect("root folder");

    let mut params = Params::new();
    params.insert("newName".into(), "a/b".into());
    let err = root.call("Rename", &params).expect_err("invalid name");

    let fault = err.fault().expect("remote fault");
    assert_eq!(fault.payload_type(), Some("InvalidName"));
    assert!(fault.is_a(conn.registry(), "MethodFault"));
    assert_eq!(
        fault.payload().and_then(|p| p.get("name")).and_then(Value::as_str),
        Some("a/b")
    );
    assert!(endpoint.folder_name.lock().is_empty());
}

#[test]
fn test_bad_password() {
    let endpoint = Arc::new(FakeEndpoint::default());
    match connect(&endpoint, "wrong") {
        Err(Error::RemoteFault(fault)) => {
            assert_eq!(fault.payload_type(), Some("InvalidLogin"));
            assert_eq!(fault.message(), "incorrect user name or password");
        }
        Err(other) => panic!("expected RemoteFault, got {}", other),
        Ok(_) => panic!("login should fail"),
    }
}

#[test]
fn test_json_schema_from_file() {
    let schema = r#"{
        "types": [
            { "name": "ServiceInstance", "kind": "managed",
              "methods": [ { "name": "CurrentTime", "result": { "type": "dateTime" } } ] }
        ]
    }"#;
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("tempfile");
    file.write_all(schema.as_bytes()).expect("write schema");

    let registry = Arc::new(SchemaLoader::load_from_file(file.path()).expect("json schema"));
    let endpoint = Arc::new(FakeEndpoint::default());
    let config = ConnectionConfig::default().revision("8.0").login(false);
    let conn = Connection::new(config, registry, Arc::clone(&endpoint));

    let si = conn.service_instance().expect("service instance");
    let now = si.call("CurrentTime", &Params::new()).expect("time");
    assert!(matches!(now, Some(Value::DateTime(_))));
    assert_eq!(endpoint.namespaces.lock().as_slice(), ["urn:vim25/8.0"]);
}

#[test]
fn test_config_from_yaml() {
    let config =
        ConnectionConfig::from_yaml("revision: \"8.0\"\nlogin: false\n").expect("config");
    let endpoint = Arc::new(FakeEndpoint::default());
    let conn = Connection::connect(config, registry(), Arc::clone(&endpoint)).expect("connect");
    assert_eq!(conn.revision(), "8.0");
    assert!(endpoint.namespaces.lock().is_empty());
}
