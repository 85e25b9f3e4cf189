use httpmock::prelude::*;
use serde_json::json;

use cloudca_provider::state::{get_string_attr, make_state, string_value};
use cloudca_provider::{CloudcaProvider, DynamicValue};

async fn configured(server: &MockServer) -> CloudcaProvider {
    mount_directory(server).await;
    configure(server).await
}

async fn mount_directory(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/services/connections")
                .header("MC-Api-Key", "secret");
            then.status(200).json_body(json!({"data": [
                {"id": "conn-1", "serviceCode": "compute-on", "name": "Compute ON", "type": "CloudCA"}
            ]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/environments");
            then.status(200).json_body(json!({"data": [
                {"id": "env-1", "name": "dev", "serviceConnection": {"id": "conn-1", "serviceCode": "compute-on"}}
            ]}));
        })
        .await;
}

async fn configure(server: &MockServer) -> CloudcaProvider {
    let provider = CloudcaProvider::new();
    let diagnostics = provider
        .configure(&make_state(vec![
            ("api_url", string_value(server.url("/v1"))),
            ("api_key", string_value("secret")),
        ]))
        .await;
    assert!(diagnostics.is_empty());
    provider
}

fn acl_config() -> DynamicValue {
    make_state(vec![
        ("service_code", string_value("compute-on")),
        ("environment_name", string_value("dev")),
        ("name", string_value("web-acl")),
        ("description", string_value("allow web")),
        ("vpc_id", string_value("vpc-1")),
    ])
}

#[tokio::test]
async fn test_create_network_acl_over_http() {
    let server = MockServer::start_async().await;
    let provider = configured(&server).await;

    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/services/compute-on/dev/networkacls")
                .json_body(json!({"name": "web-acl", "description": "allow web", "vpcId": "vpc-1"}));
            then.status(200).json_body(json!({"data": {
                "id": "acl-1", "name": "web-acl", "description": "allow web", "vpcId": "vpc-1"
            }}));
        })
        .await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/services/compute-on/dev/networkacls/acl-1");
            then.status(200).json_body(json!({"data": {
                "id": "acl-1", "name": "web-acl", "description": "allow web", "vpcId": "vpc-1"
            }}));
        })
        .await;

    let state = provider
        .apply_resource_change("cloudca_network_acl", &DynamicValue::Null, &acl_config())
        .await
        .unwrap();

    create.assert_async().await;
    get.assert_async().await;
    assert_eq!(state.id(), "acl-1");
    assert_eq!(get_string_attr(&state, "description"), "allow web");
}

#[tokio::test]
async fn test_read_404_over_http_removes_resource() {
    let server = MockServer::start_async().await;
    let provider = configured(&server).await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/services/compute-on/dev/networkacls/acl-404");
            then.status(404).json_body(json!({"errors": [{"code": "NOT_FOUND", "message": "acl-404"}]}));
        })
        .await;

    let state = acl_config().with_attr("id", string_value("acl-404"));
    let refreshed = provider
        .read_resource("cloudca_network_acl", &state)
        .await
        .unwrap();

    assert!(refreshed.is_none());
}

#[tokio::test]
async fn test_release_404_over_http_succeeds() {
    let server = MockServer::start_async().await;
    let provider = configured(&server).await;

    let release = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/v1/services/compute-on/dev/publicipaddresses/ip-404");
            then.status(404);
        })
        .await;

    let state = make_state(vec![
        ("id", string_value("ip-404")),
        ("service_code", string_value("compute-on")),
        ("environment_name", string_value("dev")),
        ("vpc_id", string_value("vpc-1")),
    ]);
    let destroyed = provider
        .apply_resource_change("cloudca_public_ip", &state, &DynamicValue::Null)
        .await
        .unwrap();

    release.assert_async().await;
    assert!(destroyed.is_null());
}

#[tokio::test]
async fn test_read_fails_when_service_lookup_fails() {
    let server = MockServer::start_async().await;
    let provider = configure(&server).await;

    let connections = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/services/connections");
            then.status(404).json_body(json!({"errors": [{"code": "NOT_FOUND", "message": "no route"}]}));
        })
        .await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/services/compute-on/dev/networkacls/acl-1");
            then.status(200).json_body(json!({"data": {"id": "acl-1"}}));
        })
        .await;

    let state = acl_config().with_attr("id", string_value("acl-1"));
    let result = provider.read_resource("cloudca_network_acl", &state).await;

    assert!(result.is_err(), "expected an error, got {:?}", result);
    connections.assert_async().await;
    get.assert_hits_async(0).await;
}
