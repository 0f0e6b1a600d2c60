//! The match flows against a real, migrated Postgres database.
//! Each test skips when no server is reachable with the `configuration/` settings.

use serde_json::{json, Value};
use uuid::Uuid;

use aoe_ledger_backend::db::MatchStore;

mod common;
use common::utils::{one_vs_one, participant, spawn_app_with_postgres};

fn player_ids(participants: &Value) -> Vec<Value> {
    participants
        .as_array()
        .map(|list| list.iter().map(|p| p["player_id"].clone()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn saved_draft_reloads_in_submitted_order() {
    let Some(test_app) = spawn_app_with_postgres().await else { return };
    let token = test_app.login().await;
    let hera = test_app.create_named_player(&token, "Hera").await;
    let viper = test_app.create_named_player(&token, "Viper").await;
    let tatoh = test_app.create_named_player(&token, "TaToH").await;
    let lierey = test_app.create_named_player(&token, "Liereyy").await;

    let body = json!({
        "map_name": "Arabia",
        "game_mode": "2v2",
        "winner_team": 2,
        "participants": [
            participant(hera, 1, "Franks"),
            participant(viper, 2, "Britons"),
            participant(tatoh, 1, "Mongols"),
            participant(lierey, 2, "Huns")
        ]
    });
    let response = test_app.post_match(&token, &body).await;
    assert_eq!(201, response.status().as_u16());
    let created: Value = response.json().await.unwrap();
    let match_id = created["data"]["match"]["id"].as_str().unwrap().to_string();

    let (status, editor) = test_app
        .get_json_with_token(&format!("/admin/matches/{}/draft", match_id), &token)
        .await;
    assert_eq!(200, status);
    assert_eq!(
        player_ids(&editor["data"]["draft"]["participants"]),
        vec![json!(hera), json!(viper), json!(tatoh), json!(lierey)]
    );

    // Listing groups by team, keeping draft order inside each team
    let (_, listing) = test_app.get_json("/matches").await;
    let listed: Vec<Value> = listing["data"][0]["participants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["player"]["id"].clone())
        .collect();
    assert_eq!(listed, vec![json!(hera), json!(tatoh), json!(viper), json!(lierey)]);

    let mut edit = body.clone();
    edit["participants"] = json!([
        participant(lierey, 2, "Huns"),
        participant(hera, 1, "Franks"),
        participant(viper, 2, "Britons"),
        participant(tatoh, 1, "Mongols")
    ]);
    let response = test_app.client
        .put(test_app.url(&format!("/admin/matches/{}", match_id)))
        .bearer_auth(&token)
        .json(&edit)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let match_id = Uuid::parse_str(&match_id).unwrap();
    let stored: Vec<Uuid> = test_app
        .store
        .get_participants(match_id)
        .await
        .expect("Failed to load participants")
        .iter()
        .map(|p| p.player_id)
        .collect();
    assert_eq!(stored, vec![lierey, hera, viper, tatoh]);
}

#[tokio::test]
async fn player_counters_follow_create_edit_and_delete() {
    let Some(test_app) = spawn_app_with_postgres().await else { return };
    let token = test_app.login().await;
    let hera = test_app.create_named_player(&token, "Hera").await;
    let viper = test_app.create_named_player(&token, "Viper").await;
    let tatoh = test_app.create_named_player(&token, "TaToH").await;

    let counters = |id: Uuid| {
        let store = test_app.store.clone();
        async move {
            let player = store
                .get_player(id)
                .await
                .expect("Failed to load player")
                .expect("Player missing");
            (player.total_matches, player.total_wins)
        }
    };

    let created: Value = test_app.post_match(&token, &one_vs_one(hera, viper)).await.json().await.unwrap();
    let match_id = created["data"]["match"]["id"].as_str().unwrap().to_string();
    assert_eq!(counters(hera).await, (1, 1));
    assert_eq!(counters(viper).await, (1, 0));

    let edit = json!({
        "map_name": "Arabia",
        "game_mode": "1v1",
        "winner_team": 2,
        "participants": [
            participant(hera, 1, "Franks"),
            participant(tatoh, 2, "Mongols")
        ]
    });
    let response = test_app.client
        .put(test_app.url(&format!("/admin/matches/{}", match_id)))
        .bearer_auth(&token)
        .json(&edit)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    assert_eq!(counters(hera).await, (1, 0));
    assert_eq!(counters(viper).await, (0, 0));
    assert_eq!(counters(tatoh).await, (1, 1));

    let (_, profile) = test_app.get_json(&format!("/players/{}", tatoh)).await;
    assert_eq!(profile["data"]["win_rate"], 100);
    assert_eq!(profile["data"]["matches"].as_array().map(Vec::len), Some(1));

    // Participants go with the match, and the counters with them
    let response = test_app.client
        .delete(test_app.url(&format!("/admin/matches/{}", match_id)))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    assert_eq!(counters(hera).await, (0, 0));
    assert_eq!(counters(tatoh).await, (0, 0));
}

#[tokio::test]
async fn deleting_a_player_drops_their_participations() {
    let Some(test_app) = spawn_app_with_postgres().await else { return };
    let token = test_app.login().await;
    let hera = test_app.create_named_player(&token, "Hera").await;
    let viper = test_app.create_named_player(&token, "Viper").await;

    let response = test_app.post_match(&token, &one_vs_one(hera, viper)).await;
    assert_eq!(201, response.status().as_u16());

    let response = test_app.client
        .delete(test_app.url(&format!("/admin/players/{}", viper)))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let (_, listing) = test_app.get_json("/matches").await;
    let participants = listing["data"][0]["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["player"]["id"], json!(hera));

    let (_, roster) = test_app.get_json("/players").await;
    assert_eq!(roster["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(roster["data"][0]["total_wins"], 1);
}

#[tokio::test]
async fn listing_is_newest_first_and_honours_limit() {
    let Some(test_app) = spawn_app_with_postgres().await else { return };
    let token = test_app.login().await;
    let hera = test_app.create_named_player(&token, "Hera").await;
    let viper = test_app.create_named_player(&token, "Viper").await;

    for played_at in ["2024-03-01T20:00:00Z", "2024-03-03T20:00:00Z", "2024-03-02T20:00:00Z"] {
        let mut body = one_vs_one(hera, viper);
        body["played_at"] = json!(played_at);
        let response = test_app.post_match(&token, &body).await;
        assert_eq!(201, response.status().as_u16());
    }

    let (status, listing) = test_app.get_json("/matches").await;
    assert_eq!(200, status);
    let played: Vec<&str> = listing["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["played_at"].as_str().unwrap())
        .collect();
    assert_eq!(played, vec!["2024-03-03T20:00:00Z", "2024-03-02T20:00:00Z", "2024-03-01T20:00:00Z"]);

    let (_, limited) = test_app.get_json("/matches?limit=2").await;
    assert_eq!(limited["data"].as_array().map(Vec::len), Some(2));

    let (_, summary) = test_app.get_json("/summary").await;
    assert_eq!(summary["data"]["total_matches"], 3);
    assert_eq!(summary["data"]["player_count"], 2);

    let (status, _) = test_app
        .get_json_with_token(&format!("/admin/matches/{}/draft", Uuid::new_v4()), &token)
        .await;
    assert_eq!(404, status);
}
