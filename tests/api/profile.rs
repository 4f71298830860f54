use crate::helpers::spawn_app;

#[tokio::test]
async fn profile_is_404_before_the_user_has_a_record() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.get_profile("token-newcomer").await;

    // assert
    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User profile not found");
}

#[tokio::test]
async fn profile_requires_a_bearer_token() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .api_client
        .get(&format!("{}/api/profile", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(
        response
            .headers()
            .get("WWW-Authenticate")
            .and_then(|h| h.to_str().ok()),
        Some("Bearer")
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No token provided");
}

#[tokio::test]
async fn an_identity_provider_outage_is_a_500() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.get_profile("outage").await;

    // assert
    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn updated_profile_is_returned_with_defaults() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .put_profile(
            "token-ayanda",
            &serde_json::json!({ "username": "ayanda", "location": "Durban" }),
        )
        .await;

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let response = app.get_profile("token-ayanda").await;
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let user = &body["data"]["user"];
    assert_eq!(user["userId"], "ayanda");
    assert_eq!(user["username"], "ayanda");
    assert_eq!(user["location"], "Durban");
    assert_eq!(user["email"], "ayanda@example.com");
    assert_eq!(user["fcmToken"], serde_json::Value::Null);
    assert_eq!(user["notificationPreferences"]["dailyReminders"], true);
}
