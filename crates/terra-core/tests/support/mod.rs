#![allow(clippy::unwrap_used, dead_code)]
// In-memory Terra controller for orchestrator tests.
//
// One wiremock responder serves every request from a shared record store,
// enough of the controller's behaviour to drive whole workflows: filtered
// list queries, per-item GET/PUT/DELETE, router sub-resources and the
// dependency checks the real controller applies on delete.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use terra_api::models::HostConnection;
use terra_api::{ClientConfig, RetryPolicy, TerraClient};
use terra_core::{HostInfo, Orchestrator, OrchestratorConfig};

pub const ORIGIN: &str = "qingcloud";

#[derive(Default)]
struct State {
    collections: HashMap<String, Vec<Value>>,
    next_id: u64,
    auth_calls: usize,
    bgp_posts: usize,
    fail_bgp_post: Option<usize>,
}

impl State {
    fn records(&mut self, collection: &str) -> &mut Vec<Value> {
        self.collections.entry(collection.to_owned()).or_default()
    }

    fn find(&self, collection: &str, id: &str) -> Option<&Value> {
        self.collections
            .get(collection)?
            .iter()
            .find(|r| r["id"] == id)
    }

    fn insert(&mut self, collection: &str, mut record: Value) -> Value {
        self.next_id += 1;
        let kind = collection.rsplit('/').next().unwrap_or(collection);
        record["id"] = Value::String(format!("{kind}-{}", self.next_id));
        self.records(collection).push(record.clone());
        record
    }

    fn remove(&mut self, collection: &str, id: &str) -> bool {
        let records = self.records(collection);
        let before = records.len();
        records.retain(|r| r["id"] != id);
        records.len() != before
    }

    fn any_where(&self, collection: &str, pred: impl Fn(&Value) -> bool) -> bool {
        self.collections
            .get(collection)
            .is_some_and(|records| records.iter().any(pred))
    }
}

/// Handle on the fake controller; clones share state.
#[derive(Clone, Default)]
pub struct FakeTerra {
    state: Arc<Mutex<State>>,
}

impl FakeTerra {
    pub async fn start() -> (MockServer, Self) {
        let server = MockServer::start().await;
        let fake = Self::default();
        Mock::given(any())
            .respond_with(fake.clone())
            .mount(&server)
            .await;
        (server, fake)
    }

    /// Register a switch with the given interfaces.
    pub fn seed_switch(&self, name: &str, interfaces: &[&str]) {
        let interfaces: Vec<Value> = interfaces
            .iter()
            .map(|i| json!({ "id": format!("{name}:{i}"), "name": i }))
            .collect();
        self.state
            .lock()
            .unwrap()
            .insert("devices", json!({ "name": name, "interfaces": interfaces }));
    }

    /// Insert a record as if some other client had created it.
    pub fn seed(&self, collection: &str, record: Value) -> Value {
        self.state.lock().unwrap().insert(collection, record)
    }

    pub fn records(&self, collection: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Records in `collection` created under `original_id`.
    pub fn by_original_id(&self, collection: &str, original_id: &str) -> Vec<Value> {
        self.records(collection)
            .into_iter()
            .filter(|r| r["original_id"] == original_id)
            .collect()
    }

    /// Controller id of the record created under `original_id`.
    pub fn id_of(&self, collection: &str, original_id: &str) -> String {
        self.by_original_id(collection, original_id)[0]["id"]
            .as_str()
            .unwrap()
            .to_owned()
    }

    pub fn auth_calls(&self) -> usize {
        self.state.lock().unwrap().auth_calls
    }

    /// Make the `n`th BGP neighbor POST (1-based) answer 500.
    pub fn fail_bgp_post(&self, n: usize) {
        self.state.lock().unwrap().fail_bgp_post = Some(n);
    }
}

fn status(code: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_json(json!({ "message": message }))
}

fn field_str(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

impl Respond for FakeTerra {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        let method = request.method.as_str().to_owned();

        if request.url.path() == "/auth/login" {
            state.auth_calls += 1;
            return ResponseTemplate::new(200).set_body_json(json!({ "token": "tok" }));
        }
        if !request.headers.contains_key("authorization") {
            return status(401, "missing token");
        }

        let Some(path) = request.url.path().strip_prefix("/v1/") else {
            return status(404, "unknown path");
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let body: Value = if request.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&request.body).unwrap_or(Value::Null)
        };
        let query: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();

        match (method.as_str(), segments.as_slice()) {
            // ── Router sub-resources ────────────────────────────────
            ("POST", ["routers", router, action @ ("add_router_interface" | "remove_router_interface")]) => {
                if state.find("routers", router).is_none() {
                    return status(404, "router");
                }
                let subnet_id = body["subnet_id"].clone();
                if state.find("subnets", subnet_id.as_str().unwrap_or_default()).is_none() {
                    return status(404, "subnet");
                }
                let key = format!("routers/{router}/interfaces");
                if *action == "add_router_interface" {
                    state.insert(&key, body);
                } else {
                    let records = state.records(&key);
                    let before = records.len();
                    records.retain(|r| r["subnet_id"] != subnet_id);
                    if records.len() == before {
                        return status(404, "router interface");
                    }
                }
                ResponseTemplate::new(200).set_body_json(json!({}))
            }
            ("POST", ["routers", router, "bgp_neighbors"]) => {
                if state.find("routers", router).is_none() {
                    return status(404, "router");
                }
                state.bgp_posts += 1;
                if state.fail_bgp_post == Some(state.bgp_posts) {
                    return status(500, "bgp session setup failed");
                }
                let record = state.insert(&format!("routers/{router}/bgp_neighbors"), body);
                ResponseTemplate::new(201).set_body_json(record)
            }
            (_, ["routers", router, sub @ ("bgp_neighbors" | "routes"), rest @ ..]) => {
                if state.find("routers", router).is_none() {
                    return status(404, "router");
                }
                let key = format!("routers/{router}/{sub}");
                serve_collection(&mut state, &method, &key, rest, body, &query)
            }

            // ── Port actions ────────────────────────────────────────
            ("POST", ["ports", port, "bind" | "unbind"]) => {
                if state.find("ports", port).is_none() {
                    return status(404, "port");
                }
                ResponseTemplate::new(200).set_body_json(json!({}))
            }

            // ── Creation rules ──────────────────────────────────────
            ("POST", ["subnets"]) => {
                let cidr = body["cidr"].as_str().unwrap_or_default();
                if !cidr.contains('/') {
                    return status(400, "invalid cidr");
                }
                if state.find("networks", body["network_id"].as_str().unwrap_or_default()).is_none() {
                    return status(404, "network");
                }
                let record = state.insert("subnets", body);
                ResponseTemplate::new(201).set_body_json(record)
            }
            ("POST", ["host_links"]) => {
                let links: Vec<Value> = body
                    .as_array()
                    .cloned()
                    .unwrap_or_default()
                    .into_iter()
                    .map(|link| state.insert("host_links", link))
                    .collect();
                ResponseTemplate::new(201).set_body_json(links)
            }

            // ── Deletion rules ──────────────────────────────────────
            ("DELETE", ["networks", id]) if state.any_where("subnets", |s| s["network_id"] == *id) => {
                status(409, "network has subnets")
            }
            ("DELETE", ["routers", id])
                if state.any_where(&format!("routers/{id}/bgp_neighbors"), |_| true) =>
            {
                status(409, "router has bgp neighbors")
            }
            ("DELETE", ["vlan_domains", id])
                if state.any_where("port_vlan_domain_bindings", |b| {
                    b["binding"]["vlan_domain_id"] == *id
                }) =>
            {
                status(409, "vlan domain in use")
            }

            // ── Plain collections ───────────────────────────────────
            (_, [collection, rest @ ..]) => {
                let collection = (*collection).to_owned();
                serve_collection(&mut state, &method, &collection, rest, body, &query)
            }
            _ => status(404, "unknown path"),
        }
    }
}

fn serve_collection(
    state: &mut State,
    method: &str,
    collection: &str,
    rest: &[&str],
    body: Value,
    query: &[(String, String)],
) -> ResponseTemplate {
    match (method, rest) {
        ("GET", []) => {
            let matches: Vec<Value> = state
                .records(collection)
                .iter()
                .filter(|r| {
                    query
                        .iter()
                        .all(|(k, v)| field_str(r, k).as_deref() == Some(v.as_str()))
                })
                .cloned()
                .collect();
            ResponseTemplate::new(200).set_body_json(matches)
        }
        ("POST", []) => {
            let record = state.insert(collection, body);
            ResponseTemplate::new(201).set_body_json(record)
        }
        ("GET", [id]) => match state.find(collection, id) {
            Some(record) => ResponseTemplate::new(200).set_body_json(record.clone()),
            None => status(404, collection),
        },
        ("PUT", [id]) => {
            let Some(record) = state
                .records(collection)
                .iter_mut()
                .find(|r| r["id"] == *id)
            else {
                return status(404, collection);
            };
            if let (Value::Object(target), Value::Object(update)) = (&mut *record, body) {
                target.extend(update);
            }
            ResponseTemplate::new(200).set_body_json(record.clone())
        }
        ("DELETE", [id]) => {
            if state.remove(collection, id) {
                ResponseTemplate::new(204)
            } else {
                status(404, collection)
            }
        }
        _ => status(405, "method not allowed"),
    }
}

// ── Orchestrator wiring ─────────────────────────────────────────────

pub fn client(server: &MockServer) -> Arc<TerraClient> {
    let config = ClientConfig::new(
        &format!("{}/v1", server.uri()),
        &format!("{}/auth/login", server.uri()),
        "admin",
        SecretString::from("secret".to_string()),
        ORIGIN,
    )
    .unwrap();
    Arc::new(TerraClient::with_client(reqwest::Client::new(), config).unwrap())
}

pub fn test_config() -> OrchestratorConfig {
    OrchestratorConfig {
        retry: RetryPolicy::none(),
        ..OrchestratorConfig::default()
    }
}

pub async fn setup_with(config: OrchestratorConfig) -> (MockServer, FakeTerra, Orchestrator) {
    let (server, fake) = FakeTerra::start().await;
    let orchestrator = Orchestrator::new(client(&server), config);
    (server, fake, orchestrator)
}

pub async fn setup() -> (MockServer, FakeTerra, Orchestrator) {
    setup_with(test_config()).await
}

/// A host cabled to `leaf-1` on one interface per entry of `ports`.
pub fn host(hostname: &str, ports: &[&str]) -> HostInfo {
    HostInfo {
        hostname: hostname.to_owned(),
        mgmt_ip: Some("10.0.0.10".to_owned()),
        connections: ports
            .iter()
            .enumerate()
            .map(|(i, port)| HostConnection {
                host_name: hostname.to_owned(),
                host_interface_name: format!("eth{i}"),
                switch_name: "leaf-1".to_owned(),
                switch_interface_name: (*port).to_owned(),
            })
            .collect(),
    }
}
