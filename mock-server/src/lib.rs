use std::{collections::BTreeMap, collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::get,
    Json, Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// What the server saw for one request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Echo {
    pub id: Uuid,
    pub method: String,
    pub path: String,
    /// Raw query string, still percent-encoded.
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub type Received = Arc<RwLock<HashMap<Uuid, Echo>>>;

/// Every request is answered with its own `Echo`. Past echoes can be fetched
/// again from `/_received/{id}`; they are kept for the life of the process.
pub fn app() -> Router {
    let received: Received = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/_received/{id}", get(get_received))
        .fallback(echo)
        .with_state(received)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    State(received): State<Received>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Echo> {
    let echo = Echo {
        id: Uuid::new_v4(),
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: collect_headers(&headers),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    info!(
        "echo {} {} {}{} ({} body bytes)",
        echo.id,
        echo.method,
        echo.path,
        echo.query.as_deref().map(|q| format!("?{q}")).unwrap_or_default(),
        body.len()
    );
    received.write().await.insert(echo.id, echo.clone());
    Json(echo)
}

async fn get_received(
    State(received): State<Received>,
    Path(id): Path<Uuid>,
) -> Result<Json<Echo>, StatusCode> {
    let received = received.read().await;
    received.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// Repeated header names are joined with `, `.
fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut out: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        out.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn echo_serializes_to_json() {
        let echo = Echo {
            id: Uuid::nil(),
            method: "GET".to_string(),
            path: "/p".to_string(),
            query: Some("a=1".to_string()),
            headers: BTreeMap::new(),
            body: String::new(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["method"], "GET");
        assert_eq!(json["query"], "a=1");
        assert_eq!(json["body"], "");
    }

    #[test]
    fn echo_roundtrips_through_json() {
        let mut headers = BTreeMap::new();
        headers.insert("x-a".to_string(), "1".to_string());
        let echo = Echo {
            id: Uuid::new_v4(),
            method: "POST".to_string(),
            path: "/".to_string(),
            query: None,
            headers,
            body: "{}".to_string(),
        };
        let json = serde_json::to_string(&echo).unwrap();
        let back: Echo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, echo);
    }

    #[test]
    fn repeated_headers_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append("x-multi", HeaderValue::from_static("a"));
        headers.append("x-multi", HeaderValue::from_static("b"));
        headers.insert("x-single", HeaderValue::from_static("c"));
        let collected = collect_headers(&headers);
        assert_eq!(collected["x-multi"], "a, b");
        assert_eq!(collected["x-single"], "c");
    }
}
