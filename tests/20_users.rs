mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn signup_returns_user_without_credentials() -> Result<()> {
    let server = common::spawn().await?;

    let res = server.signup("alice").await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("refreshTokens").is_none());
    assert!(body["message"].is_string());

    Ok(())
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() -> Result<()> {
    let server = common::spawn().await?;

    assert_eq!(server.signup("bob").await?.status(), StatusCode::CREATED);
    let res = server.signup("bob").await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "CONFLICT");

    Ok(())
}

#[tokio::test]
async fn signup_validates_every_field() -> Result<()> {
    let server = common::spawn().await?;

    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "username": "x", "email": "nope", "password": "short" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["validations"]["username"]["error"], true);
    assert_eq!(body["validations"]["email"]["error"], true);
    assert_eq!(body["validations"]["password"]["error"], true);

    Ok(())
}

#[tokio::test]
async fn signin_issues_three_tokens() -> Result<()> {
    let server = common::spawn().await?;
    server.signup("carol").await?;

    let res = server.signin("carol", common::PASSWORD).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["user"]["username"], "carol");
    for key in ["accessToken", "refreshToken", "csrfToken"] {
        assert!(body["tokens"][key].as_str().is_some_and(|t| !t.is_empty()), "missing {}", key);
    }

    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_a_generic_401() -> Result<()> {
    let server = common::spawn().await?;
    server.signup("dave").await?;

    let wrong_password = server.signin("dave", "not-the-password").await?;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = wrong_password.json().await?;

    let unknown_user = server.signin("nobody", common::PASSWORD).await?;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: Value = unknown_user.json().await?;

    assert_eq!(wrong_password["message"], unknown_user["message"]);

    Ok(())
}

#[tokio::test]
async fn me_returns_the_token_holder() -> Result<()> {
    let server = common::spawn().await?;
    let session = server.session("erin").await?;

    let (status, body) = session.get("/users/me").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "erin");
    assert_eq!(body["user"]["id"], session.user_id.as_str());

    Ok(())
}

#[tokio::test]
async fn refresh_token_mints_a_new_access_token() -> Result<()> {
    let server = common::spawn().await?;
    let session = server.session("frank").await?;

    let res = server
        .client
        .post(server.url("/users/token"))
        .json(&json!({ "refreshToken": session.refresh_token }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let access = body["tokens"]["accessToken"].as_str().unwrap().to_string();
    let csrf = body["tokens"]["csrfToken"].as_str().unwrap().to_string();
    assert!(body["tokens"].get("refreshToken").is_none());

    // The new pair works for a write.
    let res = server
        .client
        .post(server.url("/lists"))
        .bearer_auth(&access)
        .header("x-csrf-token", &csrf)
        .json(&json!({ "name": "After refresh" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    Ok(())
}

#[tokio::test]
async fn refresh_rejects_unknown_tokens() -> Result<()> {
    let server = common::spawn().await?;

    let res = server
        .client
        .post(server.url("/users/token"))
        .json(&json!({ "refreshToken": "garbage" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server
        .client
        .post(server.url("/users/token"))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn deleted_user_cannot_sign_in_again() -> Result<()> {
    let server = common::spawn().await?;
    let session = server.session("gina").await?;

    let (status, body) = session.send_empty(Method::DELETE, "/users/gina").await?;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let res = server.signin("gina", common::PASSWORD).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn users_cannot_delete_each_other() -> Result<()> {
    let server = common::spawn().await?;
    let session = server.session("hank").await?;
    server.signup("ivy").await?;

    let (status, _) = session.send_empty(Method::DELETE, "/users/ivy").await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let res = server.signin("ivy", common::PASSWORD).await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}
