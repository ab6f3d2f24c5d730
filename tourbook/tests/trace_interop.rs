use axum::{Router, extract::Path, routing::get};
use tourbook::http::Payload;
use tourbook::http::middleware::{
    RequestTraceLayer, TRACE_ID_HEADER, response_mapper_layer,
};
use tourbook::trace::get_current_trace_id;

async fn find_tour(Path(id): Path<i64>) -> tourbook::Result<Payload<String>> {
    if id != 1 {
        return Err(tourbook::Error::not_found("Tour not found"));
    }
    let trace_id = get_current_trace_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "none".to_string());
    Ok(Payload::ok("Tour found", trace_id))
}

async fn spawn_server() -> std::net::SocketAddr {
    tourbook::trace::init(&tourbook::config::TraceConfig::default())
        .expect("Failed to initialize tracing");

    let app = Router::new()
        .route("/tours/{id}", get(find_tour))
        .layer(axum::middleware::from_fn(response_mapper_layer))
        .layer(RequestTraceLayer);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_trace_id_propagates_into_handler() {
    let addr = spawn_server().await;
    let trace_id = "0af7651916cd43dd8448eb211c80319c";

    let response = reqwest::Client::new()
        .get(format!("http://{}/tours/1", addr))
        .header("traceparent", format!("00-{}-b7ad6b7169203331-01", trace_id))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.headers().get(TRACE_ID_HEADER).unwrap().to_str().unwrap(),
        trace_id
    );

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], 200);
    assert_eq!(body["data"], trace_id, "handler should run inside the caller's trace");
}

#[tokio::test]
async fn test_not_found_keeps_payload_shape_and_trace_header() {
    let addr = spawn_server().await;

    let response = reqwest::Client::new()
        .get(format!("http://{}/tours/99", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], 404);
    assert_eq!(body["message"], "Tour not found");
}

#[tokio::test]
async fn test_bad_path_param_is_json() {
    let addr = spawn_server().await;

    let response = reqwest::Client::new()
        .get(format!("http://{}/tours/abc", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], 400);
}
