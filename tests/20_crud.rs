mod common;

use anyhow::Result;
use axum::http::{header, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn create_repeat_update_delete() -> Result<()> {
    let app = TestApp::new();
    let users = json!({ "id": "5", "name": "Users", "orderNo": 1, "parentId": 0 });

    let (status, created) = app.post_json("/add", users.clone()).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created, json!({ "status": "SUCCESS", "msg": "module added", "data": null }));

    let (_, repeated) = app.post_json("/add", users).await?;
    assert_eq!(repeated["status"], "FAILURE");
    assert!(repeated["msg"].as_str().unwrap_or_default().contains("already exists"));

    let (_, updated) = app
        .post_json("/update", json!({ "id": "5", "name": "Users2", "orderNo": 1, "parentId": 0 }))
        .await?;
    assert_eq!(updated["status"], "SUCCESS");

    let (_, found) = app.get("/get/5").await?;
    assert_eq!(found["status"], "SUCCESS");
    assert_eq!(found["data"]["name"], "Users2");

    let (_, deleted) = app.post_json("/delete", json!({ "id": "5" })).await?;
    assert_eq!(deleted["status"], "SUCCESS");

    let (_, gone) = app.get("/get/5").await?;
    assert_eq!(gone, json!({ "status": "FAILURE", "msg": null, "data": null }));
    Ok(())
}

#[tokio::test]
async fn created_module_reads_back_with_formatted_dates() -> Result<()> {
    let app = TestApp::new();
    app.seed("5", "Users", 1, 0).await?;

    let (_, found) = app.get("/get/5").await?;
    let data = &found["data"];
    assert_eq!(data["id"], "5");
    assert_eq!(data["orderNo"], 1);
    assert_eq!(data["parentId"], 0);
    assert_eq!(data["level"], 1);

    let created = data["createTime"].as_str().unwrap_or_default();
    assert_eq!(created.len(), 19, "unexpected date shape: {}", created);
    assert_eq!(&created[10..11], " ");
    Ok(())
}

#[tokio::test]
async fn timestamp_shaped_text_reads_back_unchanged() -> Result<()> {
    let app = TestApp::new();
    let module = json!({
        "id": "2024-03-01T08:30:05Z",
        "name": "2024-03-01T08:30:05Z",
        "orderNo": 1,
        "parentId": 0,
        "url": "2024-03-01T08:30:05+08:00",
        "icon": "2024-03-01T08:30:05.5Z"
    });
    let (_, created) = app.post_json("/add", module.clone()).await?;
    assert_eq!(created["status"], "SUCCESS");

    let (_, found) = app.get("/get/2024-03-01T08:30:05Z").await?;
    for field in ["id", "name", "url", "icon"] {
        assert_eq!(found["data"][field], module[field], "{} was rewritten", field);
    }
    let created = found["data"]["createTime"].as_str().unwrap_or_default();
    assert_eq!(&created[10..11], " ");
    Ok(())
}

#[tokio::test]
async fn validation_reports_first_failing_rule() -> Result<()> {
    let app = TestApp::new();
    let cases = [
        (json!({ "name": "Users", "orderNo": 1, "parentId": 0 }), "id must not be null"),
        (
            json!({ "id": "5", "name": "", "orderNo": 1, "parentId": 0 }),
            "name length must be between 1 and 100 characters",
        ),
        (
            json!({ "id": "5", "name": "x".repeat(101), "orderNo": 1, "parentId": 0 }),
            "name length must be between 1 and 100 characters",
        ),
        (json!({ "id": "5", "name": "Users", "parentId": 0 }), "orderNo must not be null"),
        (json!({ "id": "5", "name": "Users", "orderNo": 1 }), "parentId must not be null"),
        (json!({}), "id must not be null"),
    ];

    for (body, reason) in cases {
        for endpoint in ["/add", "/update"] {
            let (status, reply) = app.post_json(endpoint, body.clone()).await?;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(reply["status"], "FAILURE", "{} {}", endpoint, body);
            assert_eq!(reply["msg"], reason, "{} {}", endpoint, body);
        }
    }

    let (_, missing) = app.get("/get/5").await?;
    assert_eq!(missing["status"], "FAILURE");
    Ok(())
}

#[tokio::test]
async fn name_of_exactly_one_hundred_characters_is_accepted() -> Result<()> {
    let app = TestApp::new();
    let (_, created) = app
        .post_json("/add", json!({ "id": "5", "name": "x".repeat(100), "orderNo": 1, "parentId": 0 }))
        .await?;
    assert_eq!(created["status"], "SUCCESS");
    Ok(())
}

#[tokio::test]
async fn zero_affected_rows_is_failure() -> Result<()> {
    let app = TestApp::new();

    let (_, updated) = app
        .post_json("/update", json!({ "id": "404", "name": "Ghost", "orderNo": 1, "parentId": 0 }))
        .await?;
    assert_eq!(updated["status"], "FAILURE");
    assert_eq!(updated["msg"], "module was not updated");

    let (_, deleted) = app.post_json("/delete", json!({ "id": "404" })).await?;
    assert_eq!(deleted["status"], "FAILURE");
    assert_eq!(deleted["msg"], "module was not deleted");
    Ok(())
}

#[tokio::test]
async fn delete_without_id_is_an_error() -> Result<()> {
    let app = TestApp::new();
    let (status, deleted) = app.post_json("/delete", json!({ "name": "Users" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "status": "ERROR", "msg": "id must not be null", "data": null }));
    Ok(())
}

#[tokio::test]
async fn deleted_id_cannot_be_reused() -> Result<()> {
    let app = TestApp::new();
    app.seed("5", "Users", 1, 0).await?;
    app.post_json("/delete", json!({ "id": "5" })).await?;

    let (_, readded) = app
        .post_json("/add", json!({ "id": "5", "name": "Users", "orderNo": 1, "parentId": 0 }))
        .await?;
    assert_eq!(readded["status"], "ERROR");
    Ok(())
}

#[tokio::test]
async fn form_posts_bind_like_json() -> Result<()> {
    let app = TestApp::new();
    let (_, created) = app
        .post_form("/add", "id=5&name=Users&orderNo=1&parentId=0&url=%2Fusers")
        .await?;
    assert_eq!(created["status"], "SUCCESS", "{}", created);

    let (_, found) = app.get("/get/5").await?;
    assert_eq!(found["data"]["url"], "/users");
    assert!(found["data"]["icon"].is_null());
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_are_error_envelopes() -> Result<()> {
    let app = TestApp::new();

    let raw = app.post_raw("/add", b"{not json".to_vec()).await?;
    assert_eq!(raw.status, StatusCode::OK);
    let (_, body) = raw.json()?;
    assert_eq!(body["status"], "ERROR");
    assert!(body["msg"].as_str().unwrap_or_default().starts_with("malformed request"));

    let (_, wrong_type) = app
        .post_json("/add", json!({ "id": "5", "name": "Users", "orderNo": "first", "parentId": 0 }))
        .await?;
    assert_eq!(wrong_type["status"], "ERROR");
    Ok(())
}

#[tokio::test]
async fn empty_body_fails_validation() -> Result<()> {
    let app = TestApp::new();
    let raw = app.post_raw("/add", Vec::new()).await?;
    let (_, body) = raw.json()?;
    assert_eq!(body["status"], "FAILURE");
    assert_eq!(body["msg"], "id must not be null");
    Ok(())
}

#[tokio::test]
async fn responses_declare_json_with_charset() -> Result<()> {
    let app = TestApp::new();
    let raw = app.post_raw("/delete", br#"{"id":"1"}"#.to_vec()).await?;
    assert_eq!(raw.headers[header::CONTENT_TYPE], "application/json;charset=UTF-8");
    Ok(())
}
