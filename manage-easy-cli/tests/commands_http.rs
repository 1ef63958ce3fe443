//! Command handlers against a mocked Cloud Functions backend

use manage_easy_board::{HttpWorkStore, Lane, LayoutConfig, StoreConfig};
use manage_easy_cli::commands;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer, token: Option<&str>) -> HttpWorkStore {
    let config = StoreConfig {
        base_url: server.uri(),
        token: token.map(str::to_string),
        ..StoreConfig::default()
    };
    HttpWorkStore::new(&config).unwrap()
}

async fn mount_listing(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/listWorks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "works": [
                {"id": "a", "status": "TODO", "order": 0, "title": "Alpha"},
                {"id": "b", "status": "TODO", "order": 1, "title": "Beta"},
                {"id": "c", "status": "TODO", "order": 2, "title": "Gamma"}
            ]
        })))
        .mount(server)
        .await;
}

#[test_log::test(tokio::test)]
async fn test_move_sends_only_shifted_items() {
    let server = MockServer::start().await;
    mount_listing(&server).await;

    // c to the top shifts everything: c->0, a->1, b->2
    for (id, order) in [("c", 0), ("a", 1), ("b", 2)] {
        Mock::given(method("POST"))
            .and(path("/updateWork"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({"id": id, "data": {"order": order}})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
    }

    let store = store_for(&server, Some("secret"));
    let out = commands::run_move(&store, &LayoutConfig::default(), "c", Lane::Todo, Some(0))
        .await
        .unwrap();
    assert!(out.contains("3 write(s) issued."));
}

#[test_log::test(tokio::test)]
async fn test_unauthorized_listing_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/listWorks"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "token expired"})))
        .mount(&server)
        .await;

    let store = store_for(&server, None);
    let err = commands::run_lanes(&store, &LayoutConfig::default(), None, false)
        .await
        .unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("failed to list work items"));
    assert!(message.contains("token expired"));
}
