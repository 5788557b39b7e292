//! End-to-end tests for the activity-type commands against a mock server

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{
    body_json, body_string, header, header_regex, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COLLECTION: &str = "/subscriptions/sub-123/resourcegroups/rg1/providers/Microsoft.DataFactory/datafactories/factory1/activityTypes";

fn resource_path(name: &str) -> String {
    format!("{}/{}", COLLECTION, name)
}

fn activity_type_json(name: &str) -> serde_json::Value {
    json!({
        "id": resource_path(name),
        "name": name,
        "properties": {
            "scope": "DataFactory",
            "baseType": "DotNetActivity",
            "schema": {"type": "object"},
            "provisioningState": "Succeeded"
        }
    })
}

/// Config file with one default profile pointing at the mock server
fn write_config(dir: &TempDir, server: &MockServer) -> PathBuf {
    let config_path = dir.path().join("config.toml");
    let content = format!(
        r#"
default_profile = "mock"

[profiles.mock]
subscription_id = "sub-123"
access_token = "test-token"
api_url = "{}"
resource_group = "rg1"
data_factory = "factory1"

[profiles.mock.long_running]
initial_delay_secs = 0
retry_delay_secs = 0
timeout_secs = 30
"#,
        server.uri()
    );
    std::fs::write(&config_path, content).unwrap();
    config_path
}

/// Run adfctl off the async runtime so the mock server keeps answering
async fn run(config_path: &PathBuf, args: &[&str]) -> assert_cmd::assert::Assert {
    let config_path = config_path.clone();
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    tokio::task::spawn_blocking(move || {
        Command::cargo_bin("adfctl")
            .unwrap()
            .env_remove("ADFCTL_PROFILE")
            .env_remove("RUST_LOG")
            .arg("--config-file")
            .arg(config_path)
            .args(args)
            .assert()
    })
    .await
    .unwrap()
}

// ============================================================================
// Get
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_get_prints_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(resource_path("MyActivity")))
        .and(query_param("api-version", "2015-10-01"))
        .and(header("authorization", "Bearer test-token"))
        .and(header_regex("user-agent", "^adfctl/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(activity_type_json("MyActivity")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    run(&config, &["activity-type", "get", "MyActivity"])
        .await
        .success()
        .stdout(predicate::str::contains("\"name\": \"MyActivity\""))
        .stdout(predicate::str::contains("DotNetActivity"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_with_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(resource_path("MyActivity")))
        .and(query_param("scope", "Subscription"))
        .respond_with(ResponseTemplate::new(200).set_body_json(activity_type_json("MyActivity")))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    run(
        &config,
        &[
            "activity-type",
            "get",
            "MyActivity",
            "--scope",
            "Subscription",
            "-q",
            "properties.baseType",
        ],
    )
    .await
    .success()
    .stdout(predicate::str::diff("\"DotNetActivity\"\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(resource_path("Missing")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "ResourceNotFound", "message": "activity type not found"}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    run(&config, &["activity-type", "get", "Missing"])
        .await
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Not found"))
        .stderr(predicate::str::contains("adfctl activity-type list"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(resource_path("MyActivity")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": "ExpiredAuthenticationToken", "message": "token expired"}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    run(&config, &["activity-type", "get", "MyActivity"])
        .await
        .failure()
        .stderr(predicate::str::contains("Authentication failed"));
}

// ============================================================================
// List
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_list_table_with_next_link_hint() {
    let server = MockServer::start().await;
    let next = format!(
        "{}{}?api-version=2015-10-01&$skiptoken=page2",
        server.uri(),
        COLLECTION
    );
    Mock::given(method("GET"))
        .and(path(COLLECTION))
        .and(query_param("includeAllVersions", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [activity_type_json("First"), activity_type_json("Second")],
            "nextLink": next
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    run(&config, &["activity-type", "list", "--all-versions"])
        .await
        .success()
        .stdout(predicate::str::contains("First"))
        .stdout(predicate::str::contains("Second"))
        .stdout(predicate::str::contains("baseType"))
        .stderr(predicate::str::contains("--next-link"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_all_follows_pages() {
    let server = MockServer::start().await;
    let next = format!(
        "{}{}?api-version=2015-10-01&$skiptoken=page2",
        server.uri(),
        COLLECTION
    );
    Mock::given(method("GET"))
        .and(path(COLLECTION))
        .and(query_param("$skiptoken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [activity_type_json("Third")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(COLLECTION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [activity_type_json("First"), activity_type_json("Second")],
            "nextLink": next
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    let output = run(&config, &["activity-type", "list", "--all", "-q", "[].name"])
        .await
        .success()
        .stderr(predicate::str::contains("--next-link").not())
        .get_output()
        .stdout
        .clone();

    let names: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(names, json!(["First", "Second", "Third"]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_next_link_verbatim() {
    let server = MockServer::start().await;
    let next = format!(
        "{}{}?api-version=2015-10-01&$skiptoken=page2",
        server.uri(),
        COLLECTION
    );
    Mock::given(method("GET"))
        .and(path(COLLECTION))
        .and(query_param("$skiptoken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [activity_type_json("Third")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    run(&config, &["activity-type", "list", "--next-link", &next, "-o", "json"])
        .await
        .success()
        .stdout(predicate::str::contains("\"name\": \"Third\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_empty_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COLLECTION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    run(&config, &["activity-type", "list"])
        .await
        .success()
        .stdout(predicate::str::contains("(none)"));
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_create_from_file() {
    let server = MockServer::start().await;
    let document = json!({
        "name": "MyActivity",
        "properties": {"scope": "DataFactory", "schema": {"type": "object"}}
    });
    Mock::given(method("PUT"))
        .and(path(resource_path("MyActivity")))
        .and(body_json(&document))
        .respond_with(ResponseTemplate::new(201).set_body_json(activity_type_json("MyActivity")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);
    let file = dir.path().join("activity.json");
    std::fs::write(&file, document.to_string()).unwrap();

    run(
        &config,
        &["activity-type", "create", "--file", file.to_str().unwrap()],
    )
    .await
    .success()
    .stdout(predicate::str::contains("Activity type 'MyActivity' created."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_rejects_non_document() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);
    let file = dir.path().join("activity.json");
    std::fs::write(&file, "[1, 2, 3]").unwrap();

    run(
        &config,
        &["activity-type", "create", "--file", file.to_str().unwrap()],
    )
    .await
    .failure()
    .stderr(predicate::str::contains("is not an ActivityType document"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_raw_sends_body_verbatim() {
    let server = MockServer::start().await;
    let raw = r#"{"name":"Raw","properties":{"scope":"DataFactory","extra":1}}"#;
    Mock::given(method("PUT"))
        .and(path(resource_path("Raw")))
        .and(body_string(raw))
        .respond_with(ResponseTemplate::new(200).set_body_json(activity_type_json("Raw")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    run(&config, &["activity-type", "create-raw", "Raw", "--data", raw])
        .await
        .success()
        .stdout(predicate::str::contains("Activity type 'Raw' updated."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_conflict_reports_request_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(resource_path("Raw")))
        .respond_with(
            ResponseTemplate::new(409)
                .insert_header("x-ms-request-id", "req-409")
                .set_body_json(json!({
                    "error": {"code": "Conflict", "message": "registration in progress"}
                })),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    run(&config, &["activity-type", "create-raw", "Raw", "--data", "{}"])
        .await
        .failure()
        .stderr(predicate::str::contains("registration in progress"))
        .stderr(predicate::str::contains("request id: req-409"));
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_no_wait_prints_status_link() {
    let server = MockServer::start().await;
    let status_url = format!("{}/operations/op-1", server.uri());
    Mock::given(method("DELETE"))
        .and(path(resource_path("Old")))
        .respond_with(ResponseTemplate::new(202).insert_header("Location", status_url.as_str()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/operations/op-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    run(&config, &["activity-type", "delete", "Old", "--no-wait"])
        .await
        .success()
        .stdout(predicate::str::contains("Delete of activity type 'Old' accepted."))
        .stdout(predicate::str::contains(status_url.as_str()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_waits_for_completion() {
    let server = MockServer::start().await;
    let status_url = format!("{}/operations/op-2", server.uri());
    Mock::given(method("DELETE"))
        .and(path(resource_path("Old")))
        .respond_with(ResponseTemplate::new(202).insert_header("Location", status_url.as_str()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/operations/op-2"))
        .respond_with(ResponseTemplate::new(202))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/operations/op-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Succeeded"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    run(&config, &["activity-type", "delete", "Old"])
        .await
        .success()
        .stdout(predicate::str::contains("Activity type 'Old' deleted."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_immediate_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(resource_path("Old")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    run(&config, &["activity-type", "delete", "Old", "-o", "json"])
        .await
        .success()
        .stdout(predicate::str::contains("\"status\": \"Succeeded\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_failure_exits_nonzero() {
    let server = MockServer::start().await;
    let status_url = format!("{}/operations/op-3", server.uri());
    Mock::given(method("DELETE"))
        .and(path(resource_path("InUse")))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Azure-AsyncOperation", status_url.as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/operations/op-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Failed",
            "error": {"code": "ActivityTypeInUse", "message": "referenced by a pipeline"}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server);

    run(&config, &["activity-type", "delete", "InUse"])
        .await
        .failure()
        .code(1)
        .stderr(predicate::str::contains("referenced by a pipeline"));
}
