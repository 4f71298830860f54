use crate::helpers::{spawn_app, spawn_app_with_store, FailingUserStore};
use std::sync::Arc;

#[tokio::test]
async fn a_test_notification_is_sent_with_the_test_type() {
    // arrange
    let app = spawn_app().await;
    app.seed_token("zanele", "device-token-1").await;

    // act
    let response = app
        .send_test_notification(
            "token-zanele",
            &serde_json::json!({
                "title": "Hello",
                "message": "From the tests",
                "data": { "listingId": "42" },
            }),
        )
        .await;

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["messageId"].is_string());

    let sent = app.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].notification.title, "Hello");
    assert_eq!(sent[0].notification.body, "From the tests");
    assert_eq!(sent[0].data.get("type").map(String::as_str), Some("test"));
    assert_eq!(sent[0].data.get("listingId").map(String::as_str), Some("42"));
}

#[tokio::test]
async fn a_test_notification_without_a_stored_token_is_a_404() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .send_test_notification("token-nobody", &serde_json::json!({}))
        .await;

    // assert
    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "User not found");
    assert!(app.sent_messages().is_empty());
}

#[tokio::test]
async fn a_provider_refusal_is_reported_not_raised() {
    // arrange
    let app = spawn_app().await;
    app.seed_token("kabelo", "stale-token").await;

    // act
    let response = app
        .send_test_notification("token-kabelo", &serde_json::json!({}))
        .await;

    // assert
    assert_eq!(response.status().as_u16(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn the_daily_broadcast_counts_successes_and_attempts_everyone() {
    // arrange
    let app = spawn_app().await;
    app.seed_token("u1", "live-1").await;
    app.seed_token("u2", "stale-2").await;
    app.seed_token("u3", "live-3").await;
    app.seed_token("u4", "stale-4").await;
    app.seed_token("u5", "live-5").await;

    // act
    let response = app.broadcast_daily_reminders().await;

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "success": true, "sent": 3, "total": 5 })
    );

    let sent = app.sent_messages();
    assert_eq!(sent.len(), 5);
    for message in &sent {
        assert_eq!(message.notification.title, "Daily Food Check-in!");
        assert_eq!(
            message.data.get("type").map(String::as_str),
            Some("daily_reminder")
        );
        assert_eq!(
            message.data.get("click_action").map(String::as_str),
            Some("FLUTTER_NOTIFICATION_CLICK")
        );
    }
}

#[tokio::test]
async fn the_daily_broadcast_needs_operator_credentials() {
    // arrange
    let app = spawn_app().await;
    app.seed_token("u1", "live-1").await;
    let test_cases = vec![
        (None, "no credentials"),
        (Some(("operator", "wrong-password")), "a wrong password"),
        (Some(("intruder", "whatever")), "an unknown username"),
    ];

    for (credentials, description) in test_cases {
        // act
        let mut request = app
            .api_client
            .post(&format!("{}/api/notifications/daily-reminders", &app.address));
        if let Some((username, password)) = credentials {
            request = request.basic_auth(username, Some(password));
        }
        let response = request.send().await.expect("Failed to execute request.");

        // assert
        assert_eq!(
            401,
            response.status().as_u16(),
            "The broadcast was not refused with {}.",
            description
        );
        assert_eq!(
            response
                .headers()
                .get("WWW-Authenticate")
                .and_then(|h| h.to_str().ok()),
            Some(r#"Basic realm="operator""#)
        );
    }
    assert!(app.sent_messages().is_empty());
}

#[tokio::test]
async fn the_daily_broadcast_is_a_500_when_recipients_cannot_be_listed() {
    // arrange
    let app = spawn_app_with_store(Arc::new(FailingUserStore)).await;

    // act
    let response = app.broadcast_daily_reminders().await;

    // assert
    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(app.sent_messages().is_empty());
}
