mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn health_reports_ok_on_reachable_store() -> Result<()> {
    let server = common::spawn().await?;

    let res = server.client.get(format!("{}/health", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");

    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = common::spawn().await?;

    let res = server.client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["endpoints"]["todos"].as_str().unwrap().starts_with("/api/v1/todos"));

    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() -> Result<()> {
    let server = common::spawn().await?;

    let res = server.client.get(server.url("/todos")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");

    let res = server
        .client
        .get(server.url("/lists"))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn custom_prefix_moves_resource_routes() -> Result<()> {
    let mut config = common::test_config();
    config.api.prefix = "/v2".to_string();
    let server = common::TestServer::spawn_with(config).await?;

    let res = server.signup("prefixed").await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(server.api_url.ends_with("/v2"));

    let res = server
        .client
        .post(format!("{}/api/v1/users", server.base_url))
        .json(&serde_json::json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn prefix_without_leading_slash_still_mounts() -> Result<()> {
    let mut config = common::test_config();
    config.api.prefix = "api/v2/".to_string();
    let server = common::TestServer::spawn_with(config).await?;

    assert!(server.api_url.ends_with("/api/v2"));
    let res = server.signup("unslashed").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = server.client.get(format!("{}/", server.base_url)).send().await?;
    let body: Value = res.json().await?;
    assert!(body["endpoints"]["lists"].as_str().unwrap().starts_with("/api/v2/lists"));

    Ok(())
}
