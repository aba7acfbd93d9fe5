use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, Echo};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn send(app: Router, request: Request<String>) -> axum::response::Response {
    app.oneshot(request).await.unwrap()
}

// --- echo ---

#[tokio::test]
async fn echoes_get_with_raw_query() {
    let resp = send(
        app(),
        Request::builder()
            .uri("/search?q=a%20b&sum=1%2B1")
            .body(String::new())
            .unwrap(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.path, "/search");
    assert_eq!(echo.query.as_deref(), Some("q=a%20b&sum=1%2B1"));
    assert!(echo.body.is_empty());
}

#[tokio::test]
async fn echoes_post_body_and_headers() {
    let resp = send(
        app(),
        Request::builder()
            .method("POST")
            .uri("/items")
            .header("Content-Type", "application/json")
            .header("X-Trace", "abc")
            .body(r#"{"a":"1"}"#.to_string())
            .unwrap(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.path, "/items");
    assert!(echo.query.is_none());
    assert_eq!(echo.headers["content-type"], "application/json");
    assert_eq!(echo.headers["x-trace"], "abc");
    assert_eq!(echo.body, r#"{"a":"1"}"#);
}

#[tokio::test]
async fn echoes_put() {
    let resp = send(
        app(),
        Request::builder()
            .method("PUT")
            .uri("/items/7")
            .body("plain".to_string())
            .unwrap(),
    )
    .await;

    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.body, "plain");
}

// --- received ---

#[tokio::test]
async fn received_echo_can_be_fetched_again() {
    let app = app();
    let resp = send(
        app.clone(),
        Request::builder()
            .method("POST")
            .uri("/form")
            .body("a=1".to_string())
            .unwrap(),
    )
    .await;
    let first: Echo = body_json(resp).await;

    let resp = send(
        app,
        Request::builder()
            .uri(format!("/_received/{}", first.id))
            .body(String::new())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let again: Echo = body_json(resp).await;
    assert_eq!(again, first);
}

#[tokio::test]
async fn unknown_received_id_is_404() {
    let resp = send(
        app(),
        Request::builder()
            .uri("/_received/00000000-0000-0000-0000-000000000000")
            .body(String::new())
            .unwrap(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn bad_received_id_is_400() {
    let resp = send(
        app(),
        Request::builder()
            .uri("/_received/not-a-uuid")
            .body(String::new())
            .unwrap(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
