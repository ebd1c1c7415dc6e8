use http_sandbox::app::run;
use http_sandbox::ServerConfig;
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[tokio::test]
async fn test_server_reports_real_peer_and_shuts_down() {
    let root = TempDir::new().unwrap();
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        upload_dir: root.path().join("uploads").to_string_lossy().into_owned(),
        ..ServerConfig::default()
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(run(listener, config, async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::new();
    let body: Value = client
        .get(format!("http://{addr}/ip"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["remoteAddress"], "127.0.0.1");
    assert_eq!(body["ip"], "127.0.0.1");
    assert_eq!(body["xForwardedFor"], Value::Null);

    let preflight = client
        .request(reqwest::Method::OPTIONS, format!("http://{addr}/export"))
        .header("origin", "https://app.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();
    assert_eq!(preflight.status(), reqwest::StatusCode::NO_CONTENT);
    assert_eq!(
        preflight.headers()["access-control-allow-headers"],
        "content-type"
    );
    assert_eq!(preflight.headers()["access-control-allow-origin"], "*");

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
