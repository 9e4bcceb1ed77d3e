use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tokio::net::TcpListener;

use resource_fetch::{DownloadEngine, FetchResult, HttpEngine};

async fn start_server() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route("/music/calm1.ogg", get(|| async { vec![1u8, 2, 3, 4] }))
        .route("/empty.png", get(|| async { Vec::<u8>::new() }))
        .route("/missing.jar", get(|| async { StatusCode::NOT_FOUND }))
        .route(
            "/slow.ogg",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                vec![1u8]
            }),
        );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}

/// Poll the engine until a result for `key` arrives.
async fn wait_for(engine: &mut HttpEngine, key: &str) -> FetchResult {
    for _ in 0..200 {
        if let Some(result) = engine.try_get_result(key) {
            return result;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("no result for {key}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_http_engine_success() {
    let (addr, _handle) = start_server().await;
    let mut engine = HttpEngine::new(tokio::runtime::Handle::current());

    engine.submit(&format!("http://{addr}/music/calm1.ogg"), "calm1");
    assert_eq!(engine.in_flight(), 1);

    let result = wait_for(&mut engine, "calm1").await;
    assert_eq!(result, FetchResult::Data(vec![1, 2, 3, 4]));
    assert_eq!(engine.in_flight(), 0);

    // Results are handed out once.
    assert_eq!(engine.try_get_result("calm1"), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_http_engine_failures() {
    let (addr, _handle) = start_server().await;
    let mut engine = HttpEngine::new(tokio::runtime::Handle::current());

    engine.submit(&format!("http://{addr}/empty.png"), "gui_patch");
    engine.submit(&format!("http://{addr}/missing.jar"), "classic_jar");

    assert_eq!(wait_for(&mut engine, "gui_patch").await, FetchResult::Failed);
    assert_eq!(wait_for(&mut engine, "classic_jar").await, FetchResult::Failed);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_http_engine_keeps_results_for_other_keys() {
    let (addr, _handle) = start_server().await;
    let mut engine = HttpEngine::new(tokio::runtime::Handle::current());

    engine.submit(&format!("http://{addr}/music/calm1.ogg"), "calm1");
    engine.submit(&format!("http://{addr}/missing.jar"), "162_jar");

    // Draining while waiting for one key must not lose the other.
    assert_eq!(wait_for(&mut engine, "162_jar").await, FetchResult::Failed);
    assert_eq!(
        wait_for(&mut engine, "calm1").await,
        FetchResult::Data(vec![1, 2, 3, 4])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_http_engine_custom_client_timeout() {
    let (addr, _handle) = start_server().await;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let mut engine = HttpEngine::with_http(http, tokio::runtime::Handle::current());

    engine.submit(&format!("http://{addr}/slow.ogg"), "calm2");
    assert_eq!(wait_for(&mut engine, "calm2").await, FetchResult::Failed);
    assert_eq!(engine.in_flight(), 0);
}
