#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use service_core::config::Config;
use std::collections::HashMap;
use tower::ServiceExt;
use valuation_service::config::ValuationConfig;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "gemini-2.0-flash-exp";

/// Build a config from explicit variables, bound to a random local port.
pub fn config_with(vars: &[(&str, &str)]) -> ValuationConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let common = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
    };

    ValuationConfig::from_lookup(common, |key| vars.get(key).cloned())
        .expect("Failed to build test config")
}

/// Config pointing the Gemini provider at a mock server.
pub fn gemini_config(api_base: &str, api_key: Option<&str>) -> ValuationConfig {
    let mut vars = vec![("GEMINI_API_BASE", api_base), ("GENAI_TEXT_MODEL", TEST_MODEL)];
    if let Some(key) = api_key {
        vars.push(("GOOGLE_API_KEY", key));
    }
    config_with(&vars)
}

pub fn generate_path() -> String {
    format!("/v1beta/models/{}:generateContent", TEST_MODEL)
}

pub fn form_post(user_input: &str) -> Request<Body> {
    let body = serde_urlencoded::to_string(&[("user_input", user_input)]).unwrap();
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Gemini `generateContent` success body with one text candidate.
pub fn completion(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 900,
            "candidatesTokenCount": 450,
            "totalTokenCount": 1350
        }
    })
}
