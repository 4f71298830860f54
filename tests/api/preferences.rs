use crate::helpers::spawn_app;

#[tokio::test]
async fn preferences_default_to_everything_enabled() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.get_preferences("token-bongani").await;

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["data"],
        serde_json::json!({
            "dailyReminders": true,
            "foodUpdates": true,
            "testNotifications": true,
        })
    );
}

#[tokio::test]
async fn a_partial_update_only_touches_the_named_fields() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .put_preferences(
            "token-bongani",
            &serde_json::json!({ "dailyReminders": false }),
        )
        .await;

    // assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = app
        .get_preferences("token-bongani")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["dailyReminders"], false);
    assert_eq!(body["data"]["foodUpdates"], true);
    assert_eq!(body["data"]["testNotifications"], true);
}
