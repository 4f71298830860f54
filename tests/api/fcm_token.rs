use crate::helpers::{spawn_app, spawn_app_with_store, FailingUserStore};
use std::sync::Arc;
use skhaftin::domain::UserId;
use skhaftin::store::UserStore;

#[tokio::test]
async fn a_valid_token_is_stored_for_the_caller() {
    // arrange
    let app = spawn_app().await;
    let token = "dGVzdA:APA91bH-x_y.z";

    // act
    let response = app
        .post_fcm_token("token-thandi", &serde_json::json!({ "token": token }))
        .await;

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let record = app
        .store
        .get_user(&UserId::parse("thandi".into()).unwrap())
        .await
        .unwrap()
        .expect("The record was not created.");
    assert_eq!(record.fcm_token.unwrap().as_ref(), token);
}

#[tokio::test]
async fn the_last_registered_token_wins() {
    // arrange
    let app = spawn_app().await;

    // act
    for token in ["first-token", "second-token"] {
        let response = app
            .post_fcm_token("token-sipho", &serde_json::json!({ "token": token }))
            .await;
        assert_eq!(response.status().as_u16(), 200);
    }

    // assert
    let record = app
        .store
        .get_user(&UserId::parse("sipho".into()).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.fcm_token.unwrap().as_ref(), "second-token");
}

#[tokio::test]
async fn a_missing_or_invalid_token_is_a_400_and_nothing_is_written() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        (serde_json::json!({}), "missing token"),
        (serde_json::json!({ "token": "" }), "empty token"),
        (serde_json::json!({ "token": null }), "null token"),
        (serde_json::json!({ "token": "   " }), "blank token"),
        (serde_json::json!({ "token": "has a space" }), "token with whitespace"),
    ];

    for (body, description) in test_cases {
        // act
        let response = app.post_fcm_token("token-lerato", &body).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload had a {}.",
            description
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
    }
    let record = app
        .store
        .get_user(&UserId::parse("lerato".into()).unwrap())
        .await
        .unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn a_missing_token_reports_that_it_is_required() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .post_fcm_token("token-lerato", &serde_json::json!({}))
        .await;

    // assert
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "FCM token is required");
}

#[tokio::test]
async fn a_malformed_body_is_a_400() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .api_client
        .post(&format!("{}/api/update-fcm-token", &app.address))
        .bearer_auth("token-lerato")
        .header("Content-Type", "application/json")
        .body("{\"token\": ")
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn registration_without_valid_credentials_is_a_401() {
    // arrange
    let app = spawn_app().await;

    // act
    let no_header = app
        .api_client
        .post(&format!("{}/api/update-fcm-token", &app.address))
        .json(&serde_json::json!({ "token": "abc" }))
        .send()
        .await
        .expect("Failed to execute request.");
    let bad_token = app
        .post_fcm_token("forged", &serde_json::json!({ "token": "abc" }))
        .await;

    // assert
    assert_eq!(no_header.status().as_u16(), 401);
    let body: serde_json::Value = no_header.json().await.unwrap();
    assert_eq!(body["error"], "No token provided");

    assert_eq!(bad_token.status().as_u16(), 401);
    let body: serde_json::Value = bad_token.json().await.unwrap();
    assert_eq!(body["error"], "Invalid token");

    assert!(app.store.users_with_push_token().await.unwrap().is_empty());
}

#[tokio::test]
async fn the_stored_token_is_the_one_notifications_are_sent_to() {
    // arrange
    let app = spawn_app().await;
    let token = "cXvK2:APA91bGh-7_Zz";
    app.post_fcm_token("token-naledi", &serde_json::json!({ "token": token }))
        .await;

    // act
    let response = app
        .send_test_notification("token-naledi", &serde_json::json!({}))
        .await;

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let sent = app.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].token.as_ref(), token);
}

#[tokio::test]
async fn a_store_failure_is_a_500() {
    // arrange
    let app = spawn_app_with_store(Arc::new(FailingUserStore)).await;

    // act
    let response = app
        .post_fcm_token("token-thabo", &serde_json::json!({ "token": "device-token" }))
        .await;

    // assert
    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "success": false, "error": "Failed to update FCM token" })
    );
}
