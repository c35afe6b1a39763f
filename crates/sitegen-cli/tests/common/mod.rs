#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed run date so undated entries are deterministic.
#[allow(dead_code)]
pub const TODAY: &str = "2024-01-05";

/// Create a `sitegen` command running in `dir`, isolated from the caller's
/// environment.
#[allow(dead_code)]
pub fn sitegen_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sitegen"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.current_dir(dir);
    cmd.env_remove("SITEGEN_API_URL");
    cmd.env_remove("SITEGEN_CONFIG");
    cmd.env("NO_COLOR", "1");
    cmd.args(["--today", TODAY]);
    cmd
}

/// Write `sitegen.toml` into `dir` pointing at `api_url`, followed by `extra`.
#[allow(dead_code)]
pub fn write_config(dir: &Path, api_url: &str, extra: &str) -> PathBuf {
    let path = dir.join("sitegen.toml");
    let content = format!(
        "[site]\nbase_url = \"https://agency.example\"\n\n[api]\nbase_url = \"{api_url}\"\nper_page = 10\n\n{extra}"
    );
    std::fs::write(&path, content).expect("failed to write sitegen.toml");
    path
}

/// Serve `items` as the single page of `/api/{endpoint}`, wrapped in `{"data": [...]}`.
#[allow(dead_code)]
pub async fn mount_collection(server: &MockServer, endpoint: &str, items: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/{endpoint}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": items })))
        .mount(server)
        .await;
}

/// Number of `<url>` elements in a sitemap document.
#[allow(dead_code)]
pub fn url_count(xml: &str) -> usize {
    xml.matches("<url>").count()
}
