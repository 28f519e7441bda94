use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use bankdesk_api::{build_app, AllowedOrigins, ChatbotConfig};
use bankdesk_core::{classify, replies, BillPolicy};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    build_app(&ChatbotConfig::default())
}

fn post_message(body: impl Into<Body>, content_type: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/api/chatbot/message");
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    builder.body(body.into()).unwrap()
}

fn post_json(payload: Value) -> Request<Body> {
    post_message(payload.to_string(), Some("application/json"))
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/chatbot/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn hello_reply_matches_classifier() {
    let response = app()
        .oneshot(post_json(json!({ "message": "hello" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "reply": classify(Some("hello")) })
    );
}

#[tokio::test]
async fn precedence_holds_over_http() {
    let response = app()
        .oneshot(post_json(
            json!({ "message": "I want to deposit and also check my balance" }),
        ))
        .await
        .unwrap();

    assert_eq!(body_json(response).await["reply"], replies::DEPOSIT);
}

#[tokio::test]
async fn missing_or_odd_message_gets_empty_reply() {
    let payloads = [
        json!({}),
        json!({ "message": null }),
        json!({ "message": 42 }),
        json!({ "message": ["deposit"] }),
        json!({ "message": "   " }),
        json!(["deposit"]),
        json!("deposit"),
    ];

    for payload in payloads {
        let response = app().oneshot(post_json(payload.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "payload: {payload}");
        assert_eq!(
            body_json(response).await["reply"],
            replies::EMPTY,
            "payload: {payload}"
        );
    }
}

#[tokio::test]
async fn bodies_without_json_get_empty_reply() {
    let requests = [
        post_message(Body::empty(), Some("application/json")),
        post_message("deposit", Some("text/plain")),
        post_message(r#"{"message":"deposit"}"#, None),
    ];

    for request in requests {
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["reply"], replies::EMPTY);
    }
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let response = app()
        .oneshot(post_message(r#"{"message": "dep"#, Some("application/json")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "malformed_json");
}

#[tokio::test]
async fn valid_json_with_odd_extra_fields_is_answered() {
    let deep = format!("{}{}", "[".repeat(300), "]".repeat(300));
    let bodies = [
        r#"{"message":"deposit","note":"\ud800"}"#.to_string(),
        format!(r#"{{"meta":{deep},"message":"deposit"}}"#),
    ];

    for body in bodies {
        let response = app()
            .oneshot(post_message(body.clone(), Some("application/json")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "body: {body}");
        assert_eq!(
            body_json(response).await["reply"],
            replies::DEPOSIT,
            "body: {body}"
        );
    }
}

#[tokio::test]
async fn undecodable_message_gets_empty_reply() {
    let response = app()
        .oneshot(post_message(
            r#"{"message":"\ud800 deposit"}"#,
            Some("application/json"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["reply"], replies::EMPTY);
}

#[tokio::test]
async fn trailing_garbage_is_still_malformed() {
    let response = app()
        .oneshot(post_message(
            r#"{"message":"deposit"} }"#,
            Some("application/json"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "malformed_json");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let config = ChatbotConfig {
        max_body_bytes: 64,
        ..ChatbotConfig::default()
    };
    let payload = json!({ "message": "deposit ".repeat(32) }).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/api/chatbot/message")
        .header("content-type", "application/json")
        .header("content-length", payload.len())
        .body(Body::from(payload))
        .unwrap();

    let response = build_app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn bill_reply_follows_deployment_policy() {
    let config = ChatbotConfig {
        bill_policy: BillPolicy::Available,
        ..ChatbotConfig::default()
    };
    let response = build_app(&config)
        .oneshot(post_json(json!({ "message": "How do I pay my bill?" })))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["reply"], replies::BILL_AVAILABLE);

    let response = app()
        .oneshot(post_json(json!({ "message": "How do I pay my bill?" })))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["reply"], replies::BILL_UNAVAILABLE);
}

#[tokio::test]
async fn preflight_allows_any_origin_by_default() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/chatbot/message")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn configured_origins_restrict_cors() {
    let config = ChatbotConfig {
        allowed_origins: AllowedOrigins::List(vec!["https://bank.example.com".to_string()]),
        ..ChatbotConfig::default()
    };
    let app = build_app(&config);

    let allowed = Request::builder()
        .uri("/api/chatbot/health")
        .header("origin", "https://bank.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(allowed).await.unwrap();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "https://bank.example.com"
    );

    let foreign = Request::builder()
        .uri("/api/chatbot/health")
        .header("origin", "https://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(foreign).await.unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let response = app()
        .oneshot(post_json(json!({ "message": "transfer" })))
        .await
        .unwrap();

    assert!(response.headers().get("x-request-id").is_some());
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}

#[tokio::test]
async fn rules_catalog_lists_table_in_order() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/chatbot/rules")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let catalog = body_json(response).await;
    let intents = catalog["rules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|rule| rule["intent"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        intents,
        vec!["deposit", "withdraw", "transfer", "bill", "support", "profile", "greeting"]
    );
    assert_eq!(catalog["bill_policy"], "unavailable");
    assert_eq!(catalog["fallback_reply"], replies::FALLBACK);
    assert_eq!(catalog["unavailable_reply"], replies::UNAVAILABLE);
}

#[tokio::test]
async fn metrics_track_classifications() {
    let app = app();

    for payload in [
        json!({ "message": "deposit" }),
        json!({ "message": "" }),
        json!({ "message": "what is the weather today" }),
    ] {
        app.clone().oneshot(post_json(payload)).await.unwrap();
    }
    app.clone()
        .oneshot(post_message("{", Some("application/json")))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/chatbot/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let snapshot = body_json(response).await;
    assert_eq!(snapshot["requests_total"], 4);
    assert_eq!(snapshot["rejected_total"], 1);
    assert_eq!(snapshot["empty_total"], 1);
    assert_eq!(snapshot["fallback_total"], 1);
    assert_eq!(snapshot["intents"]["deposit"], 1);
}
