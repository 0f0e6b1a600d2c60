use serde_json::json;
use uuid::Uuid;

mod common;
use common::utils::{player_id, spawn_app};

#[tokio::test]
async fn create_player_applies_defaults() {
    let test_app = spawn_app().await;
    let token = test_app.login().await;

    let player = test_app.create_player(&token, json!({
        "name": "  Dany  ",
        "nickname": "   ",
        "steam_id": "76561198000000000"
    })).await;

    assert_eq!(player["name"], "Dany");
    assert!(player["nickname"].is_null(), "Blank nickname should be dropped");
    assert_eq!(player["preferred_color"], "Blue");
    assert_eq!(player["elo_rating"], 1000);
    assert_eq!(player["total_matches"], 0);
    assert_eq!(player["total_wins"], 0);
}

#[tokio::test]
async fn create_player_rejects_blank_name() {
    let test_app = spawn_app().await;
    let token = test_app.login().await;

    let response = test_app.client
        .post(test_app.url("/admin/players"))
        .bearer_auth(&token)
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Player name is required");
}

#[tokio::test]
async fn roster_without_wins_is_sorted_by_name() {
    let test_app = spawn_app().await;
    let token = test_app.login().await;

    for name in ["Viper", "Hera", "Liereyy"] {
        test_app.create_named_player(&token, name).await;
    }

    let (status, body) = test_app.get_json("/players").await;
    assert_eq!(200, status);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Hera", "Liereyy", "Viper"]);
}

#[tokio::test]
async fn update_and_delete_player() {
    let test_app = spawn_app().await;
    let token = test_app.login().await;
    let created = test_app.create_player(&token, json!({ "name": "Dany" })).await;
    let id = player_id(&created);

    let response = test_app.client
        .put(test_app.url(&format!("/admin/players/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "name": "Daniel", "nickname": "Dany", "preferred_color": "Orange" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Daniel");
    assert_eq!(body["data"]["nickname"], "Dany");
    assert_eq!(body["data"]["preferred_color"], "Orange");

    let response = test_app.client
        .delete(test_app.url(&format!("/admin/players/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let (status, _) = test_app.get_json(&format!("/players/{}", id)).await;
    assert_eq!(404, status);
}

#[tokio::test]
async fn missing_player_returns_404() {
    let test_app = spawn_app().await;
    let token = test_app.login().await;
    let missing = Uuid::new_v4();

    let (status, body) = test_app.get_json(&format!("/players/{}", missing)).await;
    assert_eq!(404, status);
    assert_eq!(body["success"], false);

    let update = test_app.client
        .put(test_app.url(&format!("/admin/players/{}", missing)))
        .bearer_auth(&token)
        .json(&json!({ "name": "Ghost" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, update.status().as_u16());

    let delete = test_app.client
        .delete(test_app.url(&format!("/admin/players/{}", missing)))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, delete.status().as_u16());
}
