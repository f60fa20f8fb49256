//! End-to-end tests for the `dnspin` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ZONE_ID: &str = "023e105f4ecef8ad9ca31a8372d0c353";
const CERT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../dnspin/testdata/mail-example-com.pem");
const DIGEST: &str = "087e1141d0c3647df52e8e591eb98da75a8321d4ec3782f0c81247b131353c46";

/// Command isolated from the user's config, credentials and token
fn dnspin(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dnspin").unwrap();
    cmd.env_remove("CLOUDFLARE_API_TOKEN")
        .env_remove("DNSPIN_API_URL")
        .env_remove("RUST_LOG")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .arg("--no-color");
    cmd
}

fn envelope(result: serde_json::Value) -> serde_json::Value {
    json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result,
        "result_info": {"page": 1, "per_page": 100, "count": 0, "total_count": 0, "total_pages": 1}
    })
}

async fn mount_zone(server: &MockServer, name: &str, id: Option<&str>) {
    let result = id.map_or_else(|| json!([]), |id| json!([{"id": id, "name": name, "status": "active"}]));
    Mock::given(method("GET"))
        .and(path("/zones"))
        .and(query_param("name", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(result)))
        .mount(server)
        .await;
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    dnspin(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tlsa"))
        .stdout(predicate::str::contains("mta-sts"));
}

#[test]
fn test_tlsa_without_token_fails() {
    let home = tempfile::tempdir().unwrap();
    let credentials = home.path().join("cloudflare.ini");
    std::fs::write(&credentials, "[cloudflare]\n").unwrap();

    dnspin(&home)
        .args(["--credentials", credentials.to_str().unwrap()])
        .args(["tlsa", "--hostname", "mail.example.com", "-p", "25", "--cert", CERT])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API token found"));
}

#[test]
fn test_tlsa_with_bad_certificate_fails() {
    let home = tempfile::tempdir().unwrap();
    let mut cert = tempfile::NamedTempFile::new().unwrap();
    writeln!(cert, "not a certificate").unwrap();

    dnspin(&home)
        .args(["--api-token", "token", "--api-url", "http://127.0.0.1:9"])
        .args(["tlsa", "--hostname", "mail.example.com", "-p", "25", "-s", "0"])
        .args(["--cert", cert.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("certificate parse error"));
}

#[test]
fn test_config_path_honours_xdg() {
    let home = tempfile::tempdir().unwrap();
    dnspin(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains(home.path().to_str().unwrap()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tlsa_creates_missing_record() {
    let server = MockServer::start().await;
    mount_zone(&server, "example.com", Some(ZONE_ID)).await;

    Mock::given(method("GET"))
        .and(path(format!("/zones/{ZONE_ID}/dns_records")))
        .and(query_param("type", "TLSA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/zones/{ZONE_ID}/dns_records")))
        .and(body_partial_json(json!({
            "type": "TLSA",
            "name": "_25._tcp.mail.example.com",
            "content": format!("3 1 1 {DIGEST}"),
            "data": {"usage": 3, "selector": 1, "matching_type": 1, "certificate": DIGEST}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": "372e67954025e0ba6aaa6d586b9e0b59",
            "name": "_25._tcp.mail.example.com",
            "type": "TLSA",
            "content": format!("3 1 1 {DIGEST}"),
            "ttl": 1
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    dnspin(&home)
        .args(["--api-token", "token", "--api-url", &server.uri(), "-o", "json"])
        .args(["tlsa", "--hostname", "mail.example.com", "-p", "25", "-s", "0", "--cert", CERT])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"applied\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mta_sts_continues_past_missing_zone() {
    let server = MockServer::start().await;
    mount_zone(&server, "example.org", None).await;
    mount_zone(&server, "example.com", Some(ZONE_ID)).await;

    Mock::given(method("GET"))
        .and(path(format!("/zones/{ZONE_ID}/dns_records")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    dnspin(&home)
        .args(["--api-token", "token", "--api-url", &server.uri()])
        .args(["mta-sts", "example.org", "example.com", "--dry-run"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("example.com"))
        .stdout(predicate::str::contains("_mta-sts.example.com"))
        .stderr(predicate::str::contains("zone example.org not found"))
        .stderr(predicate::str::contains("records could not be fully updated for: example.org"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mta_sts_json_is_one_document() {
    let server = MockServer::start().await;
    mount_zone(&server, "example.org", None).await;
    mount_zone(&server, "example.com", Some(ZONE_ID)).await;

    Mock::given(method("GET"))
        .and(path(format!("/zones/{ZONE_ID}/dns_records")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let output = dnspin(&home)
        .args(["--api-token", "token", "--api-url", &server.uri(), "-o", "json"])
        .args(["mta-sts", "example.org", "example.com", "--dry-run"])
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let zones = parsed.as_array().unwrap();
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0]["zone"], "example.org");
    assert!(zones[0]["error"].as_str().unwrap().contains("not found"));
    assert_eq!(zones[1]["zone"], "example.com");
    assert!(zones[1].get("error").is_none());
}
