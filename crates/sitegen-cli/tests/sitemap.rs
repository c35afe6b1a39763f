#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::{mount_collection, sitegen_cmd, url_count, write_config};
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::tempdir;
use wiremock::MockServer;

#[tokio::test]
async fn sitemap_merges_static_pages_with_collections() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = MockServer::start().await;
    mount_collection(
        &server,
        "blogs",
        json!([
            {"slug": "launch-recap", "updatedAt": "2024-01-03T10:00:00Z"},
            {"slug": "brand-refresh", "createdAt": "2023-11-20 08:00:00"}
        ]),
    )
    .await;
    mount_collection(&server, "showcase", json!([{"slug": "summer-campaign"}])).await;
    write_config(dir.path(), &format!("{}/api", server.uri()), "");

    sitegen_cmd(dir.path()).assert().success();

    let xml = fs::read_to_string(dir.path().join("public/sitemap.xml"))?;
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\""));
    assert_eq!(url_count(&xml), 7 + 3);
    assert!(xml.contains("<loc>https://agency.example/blogs/launch-recap</loc>"));
    assert!(xml.contains("<lastmod>2024-01-03</lastmod>"));
    assert!(xml.contains("<lastmod>2023-11-20</lastmod>"));
    assert!(xml.contains("<loc>https://agency.example/showcase/summer-campaign</loc>"));

    // Static pages come first.
    let home = xml.find("<loc>https://agency.example/</loc>").unwrap();
    let blog = xml.find("/blogs/launch-recap").unwrap();
    assert!(home < blog);
    Ok(())
}

#[tokio::test]
async fn unreachable_collection_still_writes_static_pages() -> anyhow::Result<()> {
    let dir = tempdir()?;
    // Nothing mounted: every collection request gets a 404.
    let server = MockServer::start().await;
    write_config(dir.path(), &format!("{}/api", server.uri()), "");

    sitegen_cmd(dir.path()).arg("sitemap").assert().success();

    let xml = fs::read_to_string(dir.path().join("public/sitemap.xml"))?;
    assert_eq!(url_count(&xml), 7);
    assert!(xml.contains("<loc>https://agency.example/influencer-network</loc>"));
    Ok(())
}

#[tokio::test]
async fn stdout_flag_prints_instead_of_writing() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = MockServer::start().await;
    mount_collection(&server, "blogs", json!([{"slug": "a"}])).await;
    write_config(
        dir.path(),
        &format!("{}/api", server.uri()),
        "[[collections]]\nname = \"blogs\"\nendpoint = \"blogs\"\npath_template = \"/blogs/{slug}\"\n\n\
         [[static_entries]]\npath = \"/\"\nchangefreq = \"weekly\"\npriority = 1.0\n",
    );

    sitegen_cmd(dir.path())
        .args(["sitemap", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<loc>https://agency.example/blogs/a</loc>"))
        .stdout(predicate::str::contains("<priority>1.0</priority>"))
        .stdout(predicate::str::contains("<priority>0.6</priority>"))
        .stdout(predicate::str::contains("<lastmod>2024-01-05</lastmod>"));

    assert!(!dir.path().join("public").exists());
    Ok(())
}

#[tokio::test]
async fn api_url_from_environment_overrides_config() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = MockServer::start().await;
    mount_collection(&server, "blogs", json!([{"slug": "from-env"}])).await;
    write_config(dir.path(), "http://127.0.0.1:9/unused", "");

    sitegen_cmd(dir.path())
        .env("SITEGEN_API_URL", format!("{}/api", server.uri()))
        .args(["sitemap", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/blogs/from-env"));
    Ok(())
}

#[tokio::test]
async fn unwritable_output_exits_with_output_code() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = MockServer::start().await;
    write_config(dir.path(), &format!("{}/api", server.uri()), "");
    // A regular file where the output directory should be.
    fs::write(dir.path().join("public"), "not a directory")?;

    sitegen_cmd(dir.path())
        .arg("sitemap")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("error:"));
    Ok(())
}

#[test]
fn invalid_config_exits_with_usage_code() -> anyhow::Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("sitegen.toml"),
        "[[collections]]\nname = \"blogs\"\nendpoint = \"blogs\"\npath_template = \"/blogs\"\n",
    )?;

    sitegen_cmd(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("{slug}"));
    Ok(())
}

#[test]
fn missing_explicit_config_exits_with_usage_code() -> anyhow::Result<()> {
    let dir = tempdir()?;
    sitegen_cmd(dir.path())
        .args(["--config", "nope.toml", "sitemap"])
        .assert()
        .code(2);
    Ok(())
}

#[tokio::test]
async fn missing_site_base_url_warns_about_placeholder() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = MockServer::start().await;
    fs::write(
        dir.path().join("sitegen.toml"),
        format!("[api]\nbase_url = \"{}/api\"\n", server.uri()),
    )?;

    sitegen_cmd(dir.path())
        .args(["sitemap", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<loc>https://example.com/</loc>"))
        .stderr(predicate::str::contains("site.base_url is not set"));

    // An explicit origin silences the warning.
    sitegen_cmd(dir.path())
        .args(["sitemap", "--stdout", "--base-url", "https://agency.example"])
        .assert()
        .success()
        .stderr(predicate::str::contains("site.base_url").not());
    Ok(())
}
