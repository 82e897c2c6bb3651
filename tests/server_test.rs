//! Integration tests for the hype detector HTTP server

#[cfg(feature = "server")]
mod server_tests {
    use axum::{http::HeaderMap, routing::get, Json, Router};
    use chrono::{Duration, Utc};
    use hype_detector::config::ApiConfig;
    use hype_detector::server::{run, serve, ServerConfig, ServerState};
    use hype_detector::TikTokClient;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    fn unconfigured_api() -> ApiConfig {
        ApiConfig::default()
    }

    /// Start a stand-in for the search API that answers every search with `body`.
    async fn start_mock_search_api(body: serde_json::Value) -> SocketAddr {
        let app = Router::new().route(
            "/feed/search",
            get(move |headers: HeaderMap| {
                let body = body.clone();
                async move {
                    if headers.get("x-rapidapi-key").is_none() {
                        return Json(serde_json::json!({ "code": -1, "msg": "missing key" }));
                    }
                    Json(body)
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        addr
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let config = ServerConfig::new(0, unconfigured_api());
        let (addr, shutdown_tx) = run(config).await.expect("Failed to start server");

        let client = reqwest::Client::new();
        let response = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["status"], "ok");
        assert!(body["version"].as_str().is_some());

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_score_endpoint() {
        let config = ServerConfig::new(0, unconfigured_api());
        let (addr, shutdown_tx) = run(config).await.expect("Failed to start server");

        let recent = (Utc::now() - Duration::days(2)).timestamp();
        let older = (Utc::now() - Duration::days(40)).timestamp();
        let request = serde_json::json!({
            "term": "vitamin c serum",
            "videos": [
                { "create_time": recent, "play_count": 5000, "digg_count": 400,
                  "comment_count": 60, "share_count": 20, "author_user_id": "a" },
                { "create_time": older, "play_count": 800, "digg_count": 30,
                  "comment_count": 4, "share_count": 1, "author_user_id": "b" }
            ]
        });

        let response = reqwest::Client::new()
            .post(format!("http://{}/score", addr))
            .json(&request)
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["term"], "vitamin c serum");
        assert_eq!(body["fetch_status"], "ok");
        assert_eq!(body["sample_size"], 2);
        assert_eq!(body["result"]["distribution_score"], 100.0);
        assert_eq!(body["totals"]["views"], 5800);
        assert_eq!(body["top_videos"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["top_videos"][0]["views"], 5000);
        let composite = body["result"]["composite_score"].as_f64().unwrap();
        assert!((0.0..=200.0).contains(&composite));

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_hype_requires_term() {
        let config = ServerConfig::new(0, unconfigured_api());
        let (addr, shutdown_tx) = run(config).await.expect("Failed to start server");

        let response = reqwest::Client::new()
            .get(format!("http://{}/hype?term=%20", addr))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["code"], "INVALID_TERM");

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_hype_without_credentials_reports_fetch_failure() {
        let config = ServerConfig::new(0, unconfigured_api());
        let (addr, shutdown_tx) = run(config).await.expect("Failed to start server");

        let response = reqwest::Client::new()
            .get(format!("http://{}/hype?term=serum", addr))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["fetch_status"], "fetch_failed");
        assert_eq!(body["result"]["composite_score"], 0.0);
        assert_eq!(body["result"]["interpretation"], "declining");
        assert!(body.get("aggregate").is_none());

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_hype_fetches_from_search_api() {
        let recent = (Utc::now() - Duration::days(1)).timestamp();
        let mock = start_mock_search_api(serde_json::json!({
            "code": 0,
            "data": { "videos": [
                { "create_time": recent, "play_count": 100, "comment_count": 5, "author": { "id": "1" } },
                { "create_time": recent, "play_count": 300, "comment_count": 9, "author": { "id": "2" } }
            ] }
        }))
        .await;

        let api = ApiConfig {
            host: "search.example.com".to_string(),
            key: "test-key".to_string(),
            ..ApiConfig::default()
        };
        let client = TikTokClient::new(api)
            .expect("Failed to create client")
            .with_base_url(format!("http://{}", mock));
        let state = Arc::new(ServerState::with_client(Some(client)));
        let (addr, shutdown_tx) = serve(state, 0).await.expect("Failed to start server");

        let response = reqwest::Client::new()
            .get(format!("http://{}/hype", addr))
            .query(&[("term", "serum")])
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["fetch_status"], "ok");
        assert_eq!(body["sample_size"], 2);
        assert_eq!(body["aggregate"]["total_unique_creators"], 2);
        // Both windows see the same single day of data
        assert_eq!(body["result"]["momentum"]["comments"], 100.0);

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_hype_with_empty_search_reports_no_matches() {
        let mock = start_mock_search_api(serde_json::json!({ "code": 0, "data": { "videos": [] } })).await;

        let api = ApiConfig {
            host: "search.example.com".to_string(),
            key: "test-key".to_string(),
            ..ApiConfig::default()
        };
        let client = TikTokClient::new(api)
            .expect("Failed to create client")
            .with_base_url(format!("http://{}", mock));
        let state = Arc::new(ServerState::with_client(Some(client)));
        let (addr, shutdown_tx) = serve(state, 0).await.expect("Failed to start server");

        let body: serde_json::Value = reqwest::Client::new()
            .get(format!("http://{}/hype?term=nothing", addr))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON");

        assert_eq!(body["fetch_status"], "no_matches");
        assert_eq!(body["result"]["composite_score"], 0.0);

        let _ = shutdown_tx.send(());
    }
}
