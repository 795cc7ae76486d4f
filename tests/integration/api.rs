//! HTTP API tests against the assembled router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use wagersim::config::AppConfig;
use wagersim::dashboard::build_router;
use wagersim::dashboard::routes::DashboardState;

fn router() -> axum::Router {
    build_router(Arc::new(DashboardState::new(AppConfig::default())))
}

async fn post_json(body: &str) -> (StatusCode, serde_json::Value) {
    let resp = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/simulate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 10_000_000).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_seeded_requests_are_reproducible() {
    let body = r#"{"initial_capital":1000,"bet_size":10,"loss_probability_pct":55,"rounds":100,"players":3,"seed":42}"#;
    let (s1, a) = tokio_test::block_on(post_json(body));
    let (s2, b) = tokio_test::block_on(post_json(body));

    assert_eq!(s1, StatusCode::OK);
    assert_eq!(s2, StatusCode::OK);
    assert_eq!(a["run"]["trajectories"], b["run"]["trajectories"]);
    assert_eq!(a["run"]["aggregate"], b["run"]["aggregate"]);
    assert_ne!(a["run"]["run_id"], b["run"]["run_id"]);
}

#[tokio::test]
async fn test_all_losses_with_certain_loss() {
    let (status, json) = post_json(
        r#"{"initial_capital":100,"bet_size":10,"loss_probability_pct":100,"rounds":5,"seed":1}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let agg = &json["run"]["aggregate"];
    assert_eq!(agg["total_wins"].as_u64(), Some(0));
    assert_eq!(agg["total_losses"].as_u64(), Some(5));
    assert_eq!(agg["mean_final_capital"].as_f64(), Some(50.0));
    assert_eq!(agg["counterparty_net_gain"].as_f64(), Some(50.0));

    let series: Vec<f64> = json["chart"]["datasets"][0]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(series, vec![90.0, 80.0, 70.0, 60.0, 50.0]);
}

#[tokio::test]
async fn test_probability_mismatch_rejected() {
    let (status, json) = post_json(
        r#"{"initial_capital":100,"bet_size":1,"loss_probability_pct":40,"win_probability_pct":50,"rounds":5}"#,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("sum to 100"));
}

#[tokio::test]
async fn test_negative_bet_rejected() {
    let (status, _) = post_json(
        r#"{"initial_capital":100,"bet_size":-1,"loss_probability_pct":40,"rounds":5}"#,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
