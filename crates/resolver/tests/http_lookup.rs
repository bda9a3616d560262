use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
use crumbtrail_protocol::parse_pathname;
use crumbtrail_resolver::{
    fetch_label, trail_text, BreadcrumbResolver, EntityLookup, HttpLookup, LookupError, LookupKey,
    ResolverConfig,
};
use serde_json::{json, Value};
use std::time::Duration;

async fn payload(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    match id.as_str() {
        "p1" => Ok(Json(json!({
            "id": "p1",
            "name": "Nose Cone A",
            "owner": "structures",
            "default_weight": 1.25,
        }))),
        "broken" => Ok(Json(json!({ "id": "broken" }))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn flight(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    match id.as_str() {
        "f1" => Ok(Json(json!({
            "id": "f1",
            "payload_id": "p1",
            "flight_date": "2024-03-05T14:30:00",
            "name": null,
            "description": null,
            "location": "Spaceport America",
            "custom_weight": null,
        }))),
        "boom" => Err(StatusCode::INTERNAL_SERVER_ERROR),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn spawn_api() -> String {
    let app = Router::new()
        .route("/api/payloads/:id", get(payload))
        .route("/api/flights/:id", get(flight));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn config(base: &str) -> ResolverConfig {
    ResolverConfig::default()
        .with_api_base_url(base)
        .with_request_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn fetches_payload_and_flight_records() {
    let base = spawn_api().await;
    let http = HttpLookup::new(&config(&base)).expect("lookup");

    let payload = http.payload("p1").await.expect("payload");
    assert_eq!(payload.name, "Nose Cone A");
    assert_eq!(payload.owner.as_deref(), Some("structures"));

    let flight = http.flight("f1").await.expect("flight");
    assert_eq!(flight.payload_id.as_deref(), Some("p1"));
    assert_eq!(
        fetch_label(&http, &LookupKey::flight("f1")).await.expect("label"),
        "Mar 5, 2024, 02:30 PM"
    );
}

#[tokio::test]
async fn maps_http_failures_to_lookup_errors() {
    let base = spawn_api().await;
    let http = HttpLookup::new(&config(&base)).expect("lookup");

    assert!(matches!(
        http.payload("nope").await,
        Err(LookupError::NotFound(_))
    ));
    assert!(matches!(
        http.flight("boom").await,
        Err(LookupError::Status { status: 500, .. })
    ));
    assert!(matches!(
        http.payload("broken").await,
        Err(LookupError::Decode { .. })
    ));
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let http = HttpLookup::new(&config(&format!("http://{addr}"))).expect("lookup");
    assert!(matches!(
        http.payload("p1").await,
        Err(LookupError::Transport { .. })
    ));
}

#[tokio::test]
async fn resolver_renders_trail_from_live_api() {
    let base = spawn_api().await;
    let resolver = BreadcrumbResolver::from_config(&config(&base)).expect("resolver");
    let path = parse_pathname("/payloads/p1/flights/f1");

    resolver.navigate(&path);
    assert_eq!(
        trail_text(&resolver.render(&path)),
        "Home › Payloads › P1 › Flights › F1"
    );

    resolver.wait_idle().await;
    assert_eq!(
        trail_text(&resolver.render(&path)),
        "Home › Payloads › Nose Cone A › Flights › Mar 5, 2024, 02:30 PM"
    );
}

#[tokio::test]
async fn missing_entities_keep_identifier_labels() {
    let base = spawn_api().await;
    let resolver = BreadcrumbResolver::from_config(&config(&base)).expect("resolver");
    let path = parse_pathname("/payloads/ghost-payload/flights/boom");

    resolver.navigate(&path);
    resolver.wait_idle().await;
    assert_eq!(
        trail_text(&resolver.render(&path)),
        "Home › Payloads › Ghost Payload › Flights › Boom"
    );
}
