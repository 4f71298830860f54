use crate::helpers::spawn_app;

#[tokio::test]
async fn unknown_routes_get_a_json_404() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .api_client
        .get(&format!("{}/api/does-not-exist", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    // assert
    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Route not found");
    assert_eq!(body["path"], "/api/does-not-exist");
}
