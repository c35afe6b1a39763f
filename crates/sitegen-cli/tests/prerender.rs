#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used, clippy::panic)]

mod common;

use common::{TODAY, mount_collection, sitegen_cmd, write_config};
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tempfile::tempdir;
use wiremock::MockServer;

const PACKAGE_JSON: &str = r#"{
  "name": "agency-site",
  "scripts": {
    "postbuild": "sitegen prerender"
  },
  "reactSnap": {
    "include": ["/"],
    "puppeteerArgs": ["--no-sandbox"]
  }
}
"#;

fn write_package_json(dir: &Path) {
    fs::write(dir.join("package.json"), PACKAGE_JSON).unwrap();
}

async fn server_with_blog() -> MockServer {
    let server = MockServer::start().await;
    mount_collection(&server, "blogs", json!([{"slug": "launch-recap"}])).await;
    server
}

#[cfg(unix)]
#[tokio::test]
async fn prerender_sees_routes_and_restores_config() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = server_with_blog().await;
    write_config(dir.path(), &format!("{}/api", server.uri()), "");
    write_package_json(dir.path());

    // Succeeds only if the injected route is present while the tool runs.
    sitegen_cmd(dir.path())
        .args([
            "prerender",
            "--",
            "sh",
            "-c",
            "grep -q /blogs/launch-recap package.json && grep -q puppeteerArgs package.json",
        ])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(dir.path().join("package.json"))?, PACKAGE_JSON);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn prerender_failure_propagates_exit_code_and_restores_config() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = server_with_blog().await;
    write_config(dir.path(), &format!("{}/api", server.uri()), "");
    write_package_json(dir.path());

    sitegen_cmd(dir.path())
        .args(["prerender", "--", "sh", "-c", "exit 4"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("sh"));

    assert_eq!(fs::read_to_string(dir.path().join("package.json"))?, PACKAGE_JSON);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn prerender_uses_configured_command_and_field() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = server_with_blog().await;
    write_config(
        dir.path(),
        &format!("{}/api", server.uri()),
        "[prerender]\nconfig_file = \"snap.json\"\ninclude_field = \"snap.routes\"\n\
         command = [\"sh\", \"-c\", \"grep -q routes snap.json\"]\n",
    );
    fs::write(dir.path().join("snap.json"), "{}\n")?;

    sitegen_cmd(dir.path()).arg("prerender").assert().success();

    assert_eq!(fs::read_to_string(dir.path().join("snap.json"))?, "{}\n");
    Ok(())
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn prerender_interrupt_restores_config() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = server_with_blog().await;
    write_config(dir.path(), &format!("{}/api", server.uri()), "");
    write_package_json(dir.path());
    let package_json = dir.path().join("package.json");

    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin!("sitegen"))
        .current_dir(dir.path())
        .env_remove("SITEGEN_API_URL")
        .env_remove("SITEGEN_CONFIG")
        .env("NO_COLOR", "1")
        .args(["--today", TODAY, "prerender", "--", "sleep", "10"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let deadline = Instant::now() + Duration::from_secs(20);
    while !fs::read_to_string(&package_json)?.contains("/blogs/launch-recap") {
        assert!(Instant::now() < deadline, "routes were never injected");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    // Let the pre-render command start before interrupting.
    tokio::time::sleep(Duration::from_millis(500)).await;

    let sent = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()?;
    assert!(sent.success());

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() > deadline {
            child.kill()?;
            panic!("sitegen did not exit after SIGINT");
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    };

    assert_eq!(status.code(), Some(130));
    assert_eq!(fs::read_to_string(&package_json)?, PACKAGE_JSON);
    Ok(())
}

#[tokio::test]
async fn prerender_dry_run_prints_routes_only() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = server_with_blog().await;
    write_config(dir.path(), &format!("{}/api", server.uri()), "");
    write_package_json(dir.path());

    sitegen_cmd(dir.path())
        .args(["prerender", "--dry-run", "--", "false"])
        .assert()
        .success()
        .stdout("/\n/contact\n/blogs/launch-recap\n");

    assert_eq!(fs::read_to_string(dir.path().join("package.json"))?, PACKAGE_JSON);
    Ok(())
}

#[tokio::test]
async fn prerender_without_config_file_is_usage_error() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = server_with_blog().await;
    write_config(dir.path(), &format!("{}/api", server.uri()), "");

    sitegen_cmd(dir.path())
        .args(["prerender", "--", "true"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("package.json"));
    Ok(())
}
