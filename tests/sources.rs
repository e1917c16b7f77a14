//! Integration tests for the medium-backed sources mounted into a hierarchy.

#![cfg(all(feature = "json", feature = "remote", feature = "cli"))]
#![allow(unsafe_code)] // For env var manipulation in tests

use clap::{Arg, Command};
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;
use tiered_config::prelude::*;
use tiered_config::sources::{ArgvSource, EnvSource, JsonFileSource, UrlSource};

/// Serve exactly one HTTP response on a local port and return its URL.
fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/config.json", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = [0u8; 4096];
        let _ = stream.read(&mut request);
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
    });

    (url, handle)
}

fn url_source(url: &str) -> UrlSource {
    UrlSource::builder()
        .with_url(url)
        .with_timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[test]
fn test_json_round_trip_through_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let mut writer = JsonFileSource::new(&path);
    writer.reset(Some(
        [("a", "1"), ("b", "2")]
            .into_iter()
            .collect::<MemoryStore>()
            .all(),
    ));
    writer.save().unwrap();

    let mut reader = JsonFileSource::new(&path);
    reader.load().unwrap();

    let expected = [("a", "1"), ("b", "2")].into_iter().collect::<MemoryStore>();
    assert_eq!(reader.all(), expected.all());
}

#[test]
fn test_json_flattening_through_hierarchy() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested.json");
    fs::write(&path, r#"{"obj":{"inner":"x"},"arr":[1,2,3]}"#).unwrap();

    let mut config = Hierarchy::new();
    config.mount("json", JsonFileSource::new(&path));

    assert_eq!(config.get("obj:inner"), Some(&Value::from("x")));
    assert_eq!(config.get("arr"), Some(&Value::from("1,2,3")));
    assert!(config.get("obj").is_none());
}

#[test]
fn test_hierarchy_save_reset_load() {
    let temp_dir = TempDir::new().unwrap();
    let path1 = temp_dir.path().join("config_test_1.json");
    let path2 = temp_dir.path().join("config_test_2.json");

    let mut config = Hierarchy::new();
    config.mount("json1", JsonFileSource::new(&path1));
    config.mount("json2", JsonFileSource::new(&path2));
    config.mounted_mut("json2").unwrap().set("asd", Value::from("123"));
    config.mounted_mut("json1").unwrap().set("asd", Value::from("321"));

    config.save().unwrap();
    config.reset(None);
    assert!(config.mounted("json1").unwrap().all().is_empty());

    config.load().unwrap();
    assert_eq!(
        config.mounted("json1").unwrap().get("asd"),
        Some(&Value::from("321"))
    );
    assert_eq!(
        config.mounted("json2").unwrap().get("asd"),
        Some(&Value::from("123"))
    );
}

#[test]
fn test_missing_file_mounts_but_load_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.json");

    let mut config = Hierarchy::new();
    let mounted = config.mount("json", JsonFileSource::new(&path));
    assert!(mounted.all().is_empty());

    let err = config.load().unwrap_err();
    assert!(err.is_load());
    assert!(err.to_string().contains("source 'json'"));

    // Saving creates the file, after which loading succeeds.
    config.mounted_mut("json").unwrap().set("k", Value::from("v"));
    config.save().unwrap();
    config.load().unwrap();
    assert_eq!(config.get("k"), Some(&Value::from("v")));
}

#[test]
fn test_json_defaults_tier_loads_on_build_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let defaults_path = temp_dir.path().join("defaults.json");
    let overrides_path = temp_dir.path().join("overrides.json");
    fs::write(&defaults_path, r#"{"timeout": "30"}"#).unwrap();

    let mut config = Hierarchy::builder()
        .with_defaults_source(JsonFileSource::new(&defaults_path))
        .with_overrides_source(JsonFileSource::new(&overrides_path))
        .build();

    // The absent override file is logged at build time, not fatal.
    assert_eq!(config.get("timeout"), Some(&Value::from("30")));

    fs::write(&defaults_path, r#"{"timeout": "45", "retries": "3"}"#).unwrap();
    let err = config.load().unwrap_err();
    assert!(err.to_string().contains("source 'overrides'"));
    assert_eq!(config.defaults().get("timeout"), Some(&Value::from("45")));
    assert_eq!(config.get("retries"), Some(&Value::from("3")));
}

#[test]
fn test_json_overrides_tier_persists_set_values() {
    let temp_dir = TempDir::new().unwrap();
    let defaults_path = temp_dir.path().join("defaults.json");
    let overrides_path = temp_dir.path().join("overrides.json");
    fs::write(&defaults_path, r#"{"timeout": "30"}"#).unwrap();

    let mut config = Hierarchy::builder()
        .with_defaults_source(JsonFileSource::new(&defaults_path))
        .with_overrides_source(JsonFileSource::new(&overrides_path))
        .build();

    config.set("timeout", Value::from("5"));
    config.save().unwrap();

    let mut written = JsonFileSource::new(&overrides_path);
    written.load().unwrap();
    assert_eq!(written.get("timeout"), Some(&Value::from("5")));

    // Defaults are never written back.
    let mut defaults = JsonFileSource::new(&defaults_path);
    defaults.load().unwrap();
    assert_eq!(defaults.get("timeout"), Some(&Value::from("30")));

    // With the override file in place, a full load succeeds.
    config.reset(None);
    config.load().unwrap();
    assert_eq!(config.get("timeout"), Some(&Value::from("5")));
}

#[test]
fn test_flat_save_loses_nesting() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested.json");
    fs::write(&path, r#"{"server":{"port":8080}}"#).unwrap();

    let mut source = JsonFileSource::new(&path);
    source.load().unwrap();
    source.save().unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, serde_json::json!({"server:port": "8080"}));
}

#[test]
fn test_env_prefix_stripping() {
    unsafe {
        std::env::set_var("TIERED_IT_APP_FOO", "bar");
    }

    let mut config = Hierarchy::new();
    config.mount("env", EnvSource::new("TIERED_IT_APP_"));
    assert_eq!(config.get("FOO"), Some(&Value::from("bar")));

    unsafe {
        std::env::remove_var("TIERED_IT_APP_FOO");
    }
}

#[test]
fn test_env_reload_sees_changes() {
    let mut config = Hierarchy::new();
    config.mount("env", EnvSource::new("TIERED_IT_RELOAD_").prefixed_only());
    assert!(config.get("VALUE").is_none());

    unsafe {
        std::env::set_var("TIERED_IT_RELOAD_VALUE", "1");
    }
    config.load().unwrap();
    assert_eq!(config.get("VALUE"), Some(&Value::from("1")));

    unsafe {
        std::env::remove_var("TIERED_IT_RELOAD_VALUE");
    }
}

#[test]
fn test_argv_from_clap_matches() {
    let matches = Command::new("app")
        .arg(Arg::new("app.db").long("app.db"))
        .arg(Arg::new("port").long("port"))
        .get_matches_from(["app", "--app.db", "postgres://localhost", "--port", "9090"]);

    let mut config = Hierarchy::builder()
        .with_defaults([("port", "8080")])
        .mount("argv", ArgvSource::from_matches(&matches, "app."))
        .build();

    assert_eq!(config.get("db"), Some(&Value::from("postgres://localhost")));
    assert_eq!(config.get("port"), Some(&Value::from("9090")));

    config.set("port", Value::from("1"));
    assert_eq!(config.get("port"), Some(&Value::from("1")));
}

#[test]
fn test_url_source_loads_json() {
    let (url, server) = serve_once("200 OK", r#"{"test":"abc","nested":{"key":1}}"#);

    let mut config = Hierarchy::new();
    config.mount("url", url_source(&url));
    server.join().unwrap();

    assert_eq!(config.get("test"), Some(&Value::from("abc")));
    assert_eq!(config.get("nested:key"), Some(&Value::from("1")));
}

#[test]
fn test_url_source_non_success_status() {
    let (url, server) = serve_once("404 Not Found", "{}");

    let mut source = url_source(&url);
    let err = source.load().unwrap_err();
    server.join().unwrap();

    assert!(err.is_load());
    assert!(err.to_string().contains("404"));
}

#[test]
fn test_url_source_malformed_body() {
    let (url, server) = serve_once("200 OK", "not json at all");

    let mut source = url_source(&url);
    source.set("previous", Value::from("kept"));
    let err = source.load().unwrap_err();
    server.join().unwrap();

    assert!(err.is_load());
    assert_eq!(source.get("previous"), Some(&Value::from("kept")));
}

#[test]
fn test_mixed_sources_precedence() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, r#"{"db":"from-file","log":"from-file"}"#).unwrap();

    let argv = ArgvSource::new([("db", "from-argv")], "");
    let config = Hierarchy::builder()
        .with_defaults([("db", "default"), ("log", "default"), ("retries", "3")])
        .mount("argv", argv)
        .mount("json", JsonFileSource::new(&path))
        .build();

    assert_eq!(config.get("db"), Some(&Value::from("from-argv")));
    assert_eq!(config.get("log"), Some(&Value::from("from-file")));
    assert_eq!(config.get("retries"), Some(&Value::from("3")));
    assert_eq!(config.mount_names(), vec!["argv", "json"]);
}
