//! # Drim Artifact Generation Integration Tests
//!
//! File: cli/tests/generate.rs
//!
//! ## Overview
//!
//! Runs `drim setup` and `drim deploy` with `--generate-only`, which needs
//! no container runtime, and checks the files they leave behind.
//!
mod common;
use common::*;
use predicates::prelude::*;
use std::fs;

fn compose_services(dir: &std::path::Path) -> Vec<String> {
    let text = fs::read_to_string(dir.join("compose.yml")).unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
    let mut names: Vec<String> = doc["services"]
        .as_mapping()
        .unwrap()
        .keys()
        .map(|k| k.as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_deploy_nginx_generate_only() {
    let dir = workspace();
    drim_cmd(dir.path())
        .args([
            "deploy",
            "--generate-only",
            "-p",
            "nginx",
            "-d",
            "https://kaneo.example.com/",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    assert_eq!(compose_services(dir.path()), vec!["backend", "frontend", "nginx"]);
    let nginx = fs::read_to_string(dir.path().join("nginx.conf")).unwrap();
    assert!(nginx.contains("server_name kaneo.example.com"));
    let env = fs::read_to_string(dir.path().join(".env")).unwrap();
    assert!(env.contains("KANEO_API_URL=http://kaneo.example.com/api"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(dir.path().join(".env")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_deploy_traefik_requires_domain() {
    let dir = workspace();
    drim_cmd(dir.path())
        .args(["deploy", "--generate-only", "-p", "traefik"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a domain"));
    assert!(!dir.path().join("compose.yml").exists());
}

#[test]
fn test_deploy_without_proxy_defaults_to_none() {
    let dir = workspace();
    drim_cmd(dir.path())
        .args(["deploy", "--generate-only"])
        .assert()
        .success();
    assert_eq!(compose_services(dir.path()), vec!["backend", "frontend"]);
    assert!(!dir.path().join("nginx.conf").exists());
}

#[test]
fn test_setup_caddy_generate_only() {
    let dir = workspace();
    drim_cmd(dir.path())
        .args(["setup", "--generate-only", "--domain", "kaneo.example.com"])
        .assert()
        .success();
    assert_eq!(
        compose_services(dir.path()),
        vec!["backend", "caddy", "frontend", "postgres"]
    );
    let caddyfile = fs::read_to_string(dir.path().join("Caddyfile")).unwrap();
    assert!(caddyfile.contains("kaneo.example.com"));
    let env = fs::read_to_string(dir.path().join(".env")).unwrap();
    assert!(env.contains("KANEO_CLIENT_URL=https://kaneo.example.com"));
    assert!(env.contains("DATABASE_URL=postgresql://"));
}

#[test]
fn test_setup_respects_project_settings() {
    let dir = workspace();
    fs::write(
        dir.path().join(".drim.toml"),
        "[defaults]\nweb_port = \"8080\"\n",
    )
    .unwrap();
    drim_cmd(dir.path())
        .args(["setup", "--generate-only", "--proxy", "none"])
        .assert()
        .success();
    let env = fs::read_to_string(dir.path().join(".env")).unwrap();
    assert!(env.contains("WEB_PORT=8080"));
    assert!(env.contains("KANEO_CLIENT_URL=http://localhost:8080"));
}

#[test]
fn test_setup_rejects_unknown_settings_key() {
    let dir = workspace();
    fs::write(dir.path().join(".drim.toml"), "[runtime]\nbinry = \"podman\"\n").unwrap();
    drim_cmd(dir.path())
        .args(["setup", "--generate-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("settings"));
}
