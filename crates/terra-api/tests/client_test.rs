#![allow(clippy::unwrap_used)]
// Integration tests for `TerraClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use terra_api::models::{SegmentType, SwitchPort, VniRange};
use terra_api::requests::{
    BgpPeerSpec, ExternalGateway, FixedIpSpec, NetworkSpec, PortBindSpec, PortSpec, RouterSpec,
    SubnetSpec, TenantRef,
};
use terra_api::{ClientConfig, Error, ResourceKind, RetryPolicy, TerraClient};

// ── Helpers ─────────────────────────────────────────────────────────

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(
        &format!("{}/v1", server.uri()),
        &format!("{}/auth/login", server.uri()),
        "admin",
        SecretString::from("secret".to_string()),
        "qingcloud",
    )
    .unwrap()
}

async fn setup() -> (MockServer, TerraClient) {
    let server = MockServer::start().await;
    let client = TerraClient::with_client(reqwest::Client::new(), config(&server)).unwrap();
    (server, client)
}

async fn mount_auth(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .mount(server)
        .await;
}

async fn mount_lookup(server: &MockServer, collection: &str, original_id: &str, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/{collection}")))
        .and(query_param("origin", "qingcloud"))
        .and(query_param("original_id", original_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": id }])))
        .mount(server)
        .await;
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_token_request_body_and_caching() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "userName": "admin", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let first = client.ensure_token().await.unwrap();
    let second = client.ensure_token().await.unwrap();
    assert_eq!(first.expose_secret(), "tok-1");
    assert_eq!(second.expose_secret(), "tok-1");
    assert!(client.session().has_token().await);
}

#[tokio::test]
async fn test_missing_token_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let result = client.ensure_token().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.session().has_token().await);
}

#[tokio::test]
async fn test_rejected_credentials() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(403).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let result = client.list_vni_pools().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_bearer_header_is_sent() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok-1").await;

    Mock::given(method("GET"))
        .and(path("/v1/vni_pools"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "pool-1", "name": "l2", "vni_ranges": [{ "start": 5000, "end": 5999 }] }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let pools = client.list_vni_pools().await.unwrap();
    assert_eq!(pools.len(), 1);
    assert_eq!(pools[0].vni_ranges, vec![VniRange { start: 5000, end: 5999 }]);
}

#[tokio::test]
async fn test_single_401_recovers_with_fresh_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok-1" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_auth(&server, "tok-2").await;

    Mock::given(method("GET"))
        .and(path("/v1/vni_pools"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/vni_pools"))
        .and(header("authorization", "Bearer tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let pools = client.list_vni_pools().await.unwrap();
    assert!(pools.is_empty());
    assert_eq!(client.ensure_token().await.unwrap().expose_secret(), "tok-2");
}

#[tokio::test]
async fn test_second_401_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok" })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/vni_pools"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let result = client.list_vni_pools().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_concurrent_ensure_token_issues_one_request() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "token": "shared" }))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (a, b) = tokio::join!(client.ensure_token(), client.ensure_token());
    assert_eq!(a.unwrap().expose_secret(), "shared");
    assert_eq!(b.unwrap().expose_secret(), "shared");
}

// ── Transport ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_timeout_retry_makes_two_attempts() {
    let server = MockServer::start().await;
    mount_auth(&server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/v1/vni_pools"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(800)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = TerraClient::new(
        config(&server)
            .with_timeout(Duration::from_millis(150))
            .with_timeout_retry(1),
    )
    .unwrap();

    let result = client.list_vni_pools().await;
    assert!(
        matches!(result, Err(Error::Timeout { attempts: 2 })),
        "expected Timeout after 2 attempts, got: {result:?}"
    );
}

#[tokio::test]
async fn test_status_codes_map_to_error_kinds() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/v1/vni_pools/conflict"))
        .respond_with(ResponseTemplate::new(409).set_body_string("pool in use"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/vni_pools/down"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/vni_pools/accepted"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/vni_pools/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    match client.get_vni_pool("conflict").await {
        Err(Error::Client { status, message }) => {
            assert_eq!(status, 409);
            assert_eq!(message, "pool in use");
        }
        other => panic!("expected Client error, got: {other:?}"),
    }
    assert!(matches!(
        client.get_vni_pool("down").await,
        Err(Error::Server { status: 503, .. })
    ));
    assert!(matches!(
        client.get_vni_pool("accepted").await,
        Err(Error::Http { status: 202, .. })
    ));
    assert!(client.get_vni_pool("gone").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let server = MockServer::start().await;
    mount_auth(&server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/v1/vni_pools"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", format!("{}/v1/elsewhere", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/elsewhere"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = TerraClient::new(config(&server)).unwrap();
    let result = client.list_vni_pools().await;
    assert!(
        matches!(result, Err(Error::Http { status: 302, .. })),
        "expected Http 302, got: {result:?}"
    );
}

#[tokio::test]
async fn test_empty_and_invalid_bodies() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/v1/host_links"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/vni_pools"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let links = client.list_host_links("bm-01").await.unwrap();
    assert!(links.is_empty());

    let result = client.list_vni_pools().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

// ── Identifier resolution ───────────────────────────────────────────

#[tokio::test]
async fn test_resolve_by_origin_and_original_id() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "networks", "vxnet-1", "n-100").await;

    let id = client.resolve(ResourceKind::Network, "vxnet-1").await.unwrap();
    assert_eq!(id, "n-100");
}

#[tokio::test]
async fn test_resolve_miss_is_not_found() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/v1/routers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client
        .resolve(ResourceKind::Router, "vpc-404")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "routers vpc-404 not found");

    assert_eq!(
        client
            .resolve_optional(ResourceKind::Router, "vpc-404")
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn test_get_or_create_tenant_creates_on_miss() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/v1/tenants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/tenants"))
        .and(body_partial_json(json!({
            "name": "Acme",
            "origin": "qingcloud",
            "original_id": "usr-1",
            "description": "Created by qingcloud"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "t-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let id = client.get_or_create_tenant("usr-1", "Acme").await.unwrap();
    assert_eq!(id, "t-1");
}

// ── Resource operations ─────────────────────────────────────────────

#[tokio::test]
async fn test_create_network_payload() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "tenants", "usr-1", "t-1").await;

    Mock::given(method("POST"))
        .and(path("/v1/networks"))
        .and(body_json(json!({
            "name": "vxnet-1",
            "origin": "qingcloud",
            "original_id": "vxnet-1",
            "tenant_id": "t-1",
            "segment:type": "vxlan",
            "router:external": false,
            "segment:global_id_pool_name": "l2-pool",
            "segment:global_id": 5001
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "n-1",
            "original_id": "vxnet-1",
            "segment:type": "vxlan",
            "segment:global_id": 5001
        })))
        .expect(1)
        .mount(&server)
        .await;

    let network = client
        .create_network(&NetworkSpec {
            original_id: "vxnet-1".into(),
            name: "vxnet-1".into(),
            tenant: TenantRef::new("usr-1", "usr-1"),
            segment_type: SegmentType::Vxlan,
            segment_global_id: Some(5001),
            vni_pool_name: Some("l2-pool".into()),
            ..NetworkSpec::default()
        })
        .await
        .unwrap();

    assert_eq!(network.id, "n-1");
    assert_eq!(network.segment_global_id, Some(5001));
}

#[tokio::test]
async fn test_delete_unknown_network_is_not_found() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/v1/networks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.delete_network("never-created").await.unwrap_err();
    assert!(err.is_not_found(), "got: {err:?}");
}

#[tokio::test]
async fn test_delete_bgp_peers_filters_by_peer_id() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "routers", "vpc-1", "r-1").await;

    Mock::given(method("GET"))
        .and(path("/v1/routers/r-1/bgp_neighbors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "p-1", "as_number": 65001, "ip_address": "10.0.0.1" },
            { "id": "p-2", "as_number": 65002, "ip_address": "10.0.0.2" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/routers/r-1/bgp_neighbors/p-2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/routers/r-1/bgp_neighbors/p-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let deleted = client
        .delete_bgp_peers("vpc-1", Some("p-2"), &RetryPolicy::none())
        .await
        .unwrap();
    assert_eq!(deleted, 1);
}

#[tokio::test]
async fn test_add_bgp_peer_retries_bad_request() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "routers", "vpc-1", "r-1").await;

    Mock::given(method("GET"))
        .and(path("/v1/devices"))
        .and(query_param("name", "border-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "sw-9", "name": "border-1", "interfaces": [] }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/routers/r-1/bgp_neighbors"))
        .respond_with(ResponseTemplate::new(400).set_body_string("vrf check in progress"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/routers/r-1/bgp_neighbors"))
        .and(body_json(json!({
            "device_id": "sw-9",
            "as_number": 65010,
            "ip_address": "172.16.0.1",
            "advertise_host_route": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "p-7" })))
        .expect(1)
        .mount(&server)
        .await;

    let peer = client
        .add_bgp_peer(
            "vpc-1",
            &BgpPeerSpec {
                as_number: 65010,
                ip_address: "172.16.0.1".into(),
                device_name: "border-1".into(),
                advertise_host_route: false,
            },
            &RetryPolicy::new(1, Duration::from_millis(10)),
        )
        .await
        .unwrap();
    assert_eq!(peer.id, "p-7");
}

#[tokio::test]
async fn test_port_binding_first_match_wins() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "networks", "vxnet-1", "n-1").await;

    Mock::given(method("GET"))
        .and(path("/v1/port_bindings"))
        .and(query_param("switch_name", "leaf-1"))
        .and(query_param("interface_name", "Ethernet1/5"))
        .and(query_param("network_id", "n-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "pb-1", "network_id": "n-1", "vlan_native": true },
            { "id": "pb-2", "network_id": "n-1" }
        ])))
        .mount(&server)
        .await;

    let binding = client
        .get_port_binding(Some("vxnet-1"), "leaf-1", "Ethernet1/5")
        .await
        .unwrap();
    assert_eq!(binding.id, "pb-1");
    assert!(binding.vlan_native);
}

#[tokio::test]
async fn test_switch_interface_lookup() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/v1/devices"))
        .and(query_param("name", "leaf-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "sw-1", "name": "leaf-1", "interfaces": [
                { "id": "if-1", "name": "Ethernet1/1" },
                { "id": "if-2", "name": "Ethernet1/2" }
            ]}
        ])))
        .mount(&server)
        .await;

    let intf = client
        .get_switch_interface("leaf-1", "Ethernet1/2")
        .await
        .unwrap();
    assert_eq!(intf.id, "if-2");

    let err = client
        .get_switch_interface("leaf-1", "Ethernet9/9")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_create_vni_pool_payload() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;

    Mock::given(method("POST"))
        .and(path("/v1/global_vni"))
        .and(body_json(json!({
            "vni_pool": [{ "name": "l3-pool", "vni_ranges": [{ "start": 9000, "end": 9099 }] }]
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    client
        .create_vni_pool("l3-pool", VniRange { start: 9000, end: 9099 })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_bgp_peers_skips_vanished_peer() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "routers", "vpc-1", "r-1").await;

    Mock::given(method("GET"))
        .and(path("/v1/routers/r-1/bgp_neighbors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "p-1", "as_number": 65001, "ip_address": "10.0.0.1" },
            { "id": "p-2", "as_number": 65002, "ip_address": "10.0.0.2" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/routers/r-1/bgp_neighbors/p-1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/routers/r-1/bgp_neighbors/p-2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let deleted = client
        .delete_bgp_peers("vpc-1", None, &RetryPolicy::none())
        .await
        .unwrap();
    assert_eq!(deleted, 1);
}

#[tokio::test]
async fn test_delete_routes_skips_vanished_route() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "routers", "vpc-1", "r-1").await;

    Mock::given(method("GET"))
        .and(path("/v1/routers/r-1/routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "rt-1", "destination": "10.1.0.0/16", "nexthop": "172.16.0.1" },
            { "id": "rt-2", "destination": "10.2.0.0/16", "nexthop": "172.16.0.1" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/routers/r-1/routes/rt-1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/routers/r-1/routes/rt-2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let deleted = client
        .delete_routes("vpc-1", None, &RetryPolicy::none())
        .await
        .unwrap();
    assert_eq!(deleted, 1);
}

// ── Full-replacement updates ────────────────────────────────────────

#[tokio::test]
async fn test_update_network_puts_full_payload() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "tenants", "usr-1", "t-1").await;
    mount_lookup(&server, "networks", "vxnet-1", "n-1").await;

    Mock::given(method("PUT"))
        .and(path("/v1/networks/n-1"))
        .and(body_json(json!({
            "name": "renamed",
            "origin": "qingcloud",
            "original_id": "vxnet-1",
            "tenant_id": "t-1",
            "segment:type": "subintf",
            "router:external": true,
            "segment_local_id": 300
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "n-1",
            "name": "renamed",
            "router:external": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let network = client
        .update_network(&NetworkSpec {
            original_id: "vxnet-1".into(),
            name: "renamed".into(),
            tenant: TenantRef::new("usr-1", "usr-1"),
            segment_type: SegmentType::Subintf,
            segment_local_id: Some(300),
            external: true,
            ..NetworkSpec::default()
        })
        .await
        .unwrap();
    assert_eq!(network.name.as_deref(), Some("renamed"));
    assert!(network.external);
}

#[tokio::test]
async fn test_update_subnet_puts_full_payload() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "tenants", "usr-1", "t-1").await;
    mount_lookup(&server, "networks", "vxnet-1", "n-1").await;
    mount_lookup(&server, "subnets", "vxnet-1", "s-1").await;

    Mock::given(method("PUT"))
        .and(path("/v1/subnets/s-1"))
        .and(body_json(json!({
            "name": "vxnet-1",
            "origin": "qingcloud",
            "original_id": "vxnet-1",
            "tenant_id": "t-1",
            "network_id": "n-1",
            "enable_dhcp": false,
            "ip_version": 4,
            "gateway_ip": "192.168.10.1",
            "cidr": "192.168.10.0/24"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "s-1",
            "cidr": "192.168.10.0/24"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let subnet = client
        .update_subnet(&SubnetSpec {
            original_id: "vxnet-1".into(),
            name: "vxnet-1".into(),
            tenant: TenantRef::new("usr-1", "usr-1"),
            network_original_id: "vxnet-1".into(),
            cidr: Some("192.168.10.0/24".into()),
            gateway_ip: Some("192.168.10.1".into()),
            ip_version: Some(4),
            enable_dhcp: false,
        })
        .await
        .unwrap();
    assert_eq!(subnet.id, "s-1");
}

#[tokio::test]
async fn test_update_router_wraps_payload_in_list() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "tenants", "usr-1", "t-1").await;
    mount_lookup(&server, "routers", "vpc-1", "r-1").await;

    Mock::given(method("PUT"))
        .and(path("/v1/routers/r-1"))
        .and(body_json(json!({
            "router": [{
                "name": "vpc-1",
                "origin": "qingcloud",
                "original_id": "vpc-1",
                "tenant_id": "t-1",
                "cisco:l3_vni": 9001
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "r-1",
            "cisco:l3_vni": 9001
        })))
        .expect(1)
        .mount(&server)
        .await;

    let router = client
        .update_router(&RouterSpec {
            original_id: "vpc-1".into(),
            name: "vpc-1".into(),
            tenant: TenantRef::new("usr-1", "usr-1"),
            l3_vni: Some(9001),
            l3_vni_pool_name: None,
        })
        .await
        .unwrap();
    assert_eq!(router.l3_vni, Some(9001));
}

#[tokio::test]
async fn test_update_port_resolves_fixed_ips() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "tenants", "usr-1", "t-1").await;
    mount_lookup(&server, "networks", "vxnet-1", "n-1").await;
    mount_lookup(&server, "subnets", "vxnet-1", "s-1").await;
    mount_lookup(&server, "ports", "vxnet-1_bm-01", "p-1").await;

    Mock::given(method("PUT"))
        .and(path("/v1/ports/p-1"))
        .and(body_json(json!({
            "name": "vxnet-1_bm-01",
            "origin": "qingcloud",
            "original_id": "vxnet-1_bm-01",
            "tenant_id": "t-1",
            "network_id": "n-1",
            "ips": [{ "subnet_id": "s-1", "ip_address": "192.168.10.5" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p-1",
            "ips": [{ "subnet_id": "s-1", "ip_address": "192.168.10.5" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let port = client
        .update_port(&PortSpec {
            original_id: "vxnet-1_bm-01".into(),
            name: "vxnet-1_bm-01".into(),
            tenant: TenantRef::new("usr-1", "usr-1"),
            network_original_id: "vxnet-1".into(),
            fixed_ips: vec![FixedIpSpec {
                subnet_original_id: "vxnet-1".into(),
                ip_address: Some("192.168.10.5".into()),
            }],
        })
        .await
        .unwrap();
    assert_eq!(port.ips[0].ip_address.as_deref(), Some("192.168.10.5"));
}

// ── Port actions and gateways ───────────────────────────────────────

#[tokio::test]
async fn test_bind_and_unbind_port() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "ports", "port-1", "p-1").await;

    Mock::given(method("POST"))
        .and(path("/v1/ports/p-1/bind"))
        .and(body_json(json!({
            "switch_name": "leaf-1",
            "interface_name": "Ethernet1/5",
            "vlan_native": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/ports/p-1/unbind"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client
        .bind_port(
            "port-1",
            &PortBindSpec {
                switch_name: "leaf-1".into(),
                interface_name: "Ethernet1/5".into(),
                vlan_native: true,
            },
        )
        .await
        .unwrap();
    client.unbind_port("port-1").await.unwrap();
}

#[tokio::test]
async fn test_set_and_clear_external_gateway() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "routers", "vpc-1", "r-1").await;
    mount_lookup(&server, "networks", "ext-net", "n-ext").await;
    mount_lookup(&server, "subnets", "ext-subnet", "s-ext").await;

    Mock::given(method("PUT"))
        .and(path("/v1/routers/r-1/external_gateway"))
        .and(body_json(json!({
            "external_gateways": [{
                "network_id": "n-ext",
                "enable_snat": true,
                "fixed_ips": [{ "subnet_id": "s-ext", "ip_address": "203.0.113.10" }]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/routers/r-1/external_gateway"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client
        .set_external_gateway(
            "vpc-1",
            &ExternalGateway {
                network_original_id: "ext-net".into(),
                enable_snat: true,
                fixed_ips: vec![FixedIpSpec {
                    subnet_original_id: "ext-subnet".into(),
                    ip_address: Some("203.0.113.10".into()),
                }],
            },
        )
        .await
        .unwrap();
    client.clear_external_gateway("vpc-1").await.unwrap();
}

#[tokio::test]
async fn test_get_vlan_domain_binding() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "port_vlan_domain_bindings", "vxnet-1_bm-01", "b-1").await;

    Mock::given(method("GET"))
        .and(path("/v1/port_vlan_domain_bindings/b-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "b-1",
            "original_id": "vxnet-1_bm-01",
            "binding": {
                "vlan_domain_id": "vd-1",
                "bind_port_list": [{ "device_name": "leaf-1", "port_name": "Ethernet1/1" }],
                "untagged_vni": 5001
            }
        })))
        .mount(&server)
        .await;

    let binding = client.get_vlan_domain_binding("vxnet-1_bm-01").await.unwrap();
    assert_eq!(binding.binding.vlan_domain_id.as_deref(), Some("vd-1"));
    assert_eq!(
        binding.binding.bind_port_list,
        vec![SwitchPort {
            device_name: "leaf-1".into(),
            port_name: "Ethernet1/1".into(),
        }]
    );
    assert_eq!(binding.binding.untagged_vni, Some(5001));
}

#[tokio::test]
async fn test_delete_tenant() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok").await;
    mount_lookup(&server, "tenants", "usr-1", "t-1").await;

    Mock::given(method("DELETE"))
        .and(path("/v1/tenants/t-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_tenant("usr-1").await.unwrap();
}
