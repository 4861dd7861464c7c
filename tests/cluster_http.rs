// ABOUTME: Wire-level tests for the HTTP pod API client.
// ABOUTME: A local TCP responder plays the control plane for one request each.

mod support;

use berth::cluster::{ClusterClient, ClusterError, HttpClusterClient, PodManifest};
use support::responder::serve_once;
use tokio::net::TcpListener;

#[tokio::test]
async fn list_pods_reads_items_metadata() {
    let (addr, server) = serve_once(
        "200 OK",
        r#"{"kind":"PodList","items":[{"metadata":{"name":"web","uid":"0f1e"}},{"metadata":{"name":"db","uid":"2d3c"}}]}"#,
    )
    .await;
    let client = HttpClusterClient::new(&format!("http://{}/", addr)).unwrap();

    let pods = client.list_pods("default").await.unwrap();
    assert_eq!(pods.len(), 2);
    assert_eq!(pods[0].name, "web");
    assert_eq!(pods[0].uid, "0f1e");

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/v1/namespaces/default/pods HTTP/1.1\r\n"));
}

#[tokio::test]
async fn create_pod_posts_manifest() {
    let (addr, server) = serve_once(
        "201 Created",
        r#"{"kind":"Pod","metadata":{"name":"web","uid":"9a8b"}}"#,
    )
    .await;
    let client = HttpClusterClient::new(&format!("http://{}/", addr)).unwrap();

    let pod = client
        .create_pod("staging", &PodManifest::single("web", "nginx"))
        .await
        .unwrap();
    assert_eq!(pod.uid, "9a8b");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/v1/namespaces/staging/pods HTTP/1.1\r\n"));
    assert!(request.contains(r#""kind":"Pod""#));
    assert!(request.contains(r#""containers":[{"name":"web","image":"nginx"}]"#));
}

#[tokio::test]
async fn read_pod_log_returns_raw_payload() {
    let (addr, server) = serve_once("200 OK", "line one\nline two\n").await;
    let client = HttpClusterClient::new(&format!("http://{}/", addr)).unwrap();

    let log = client.read_pod_log("default", "web").await.unwrap();
    assert_eq!(log, "line one\nline two\n");
    assert_eq!(client.last_response().as_deref(), Some("line one\nline two\n"));

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/v1/namespaces/default/pods/web/log HTTP/1.1\r\n"));
}

#[tokio::test]
async fn exec_pod_sends_command_as_query() {
    let (addr, server) = serve_once("200 OK", "total 0\n").await;
    let client = HttpClusterClient::new(&format!("http://{}/", addr)).unwrap();

    let output = client
        .exec_pod("default", "web", &["ls".to_string(), "-la".to_string(), "/tmp dir".to_string()])
        .await
        .unwrap();
    assert_eq!(output, "total 0\n");

    let request = server.await.unwrap();
    let request_line = request.lines().next().unwrap();
    assert_eq!(
        request_line,
        "POST /api/v1/namespaces/default/pods/web/exec?command=ls&command=-la&command=%2Ftmp+dir&stdout=true&stderr=true HTTP/1.1"
    );
}

#[tokio::test]
async fn missing_pod_maps_to_not_found() {
    let (addr, server) = serve_once(
        "404 Not Found",
        r#"{"kind":"Status","status":"Failure","message":"pods \"ghost\" not found","code":404}"#,
    )
    .await;
    let client = HttpClusterClient::new(&format!("http://{}/", addr)).unwrap();

    let err = client.read_pod_log("default", "ghost").await.unwrap_err();
    assert_eq!(err, ClusterError::NotFound("pods \"ghost\" not found".to_string()));
    assert!(client.last_response().unwrap().contains("Failure"));
    server.await.unwrap();
}

#[tokio::test]
async fn error_status_maps_to_api_error() {
    let (addr, server) = serve_once(
        "409 Conflict",
        r#"{"kind":"Status","message":"pods \"web\" already exists"}"#,
    )
    .await;
    let client = HttpClusterClient::new(&format!("http://{}/", addr)).unwrap();

    let err = client
        .create_pod("default", &PodManifest::single("web", "nginx"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ClusterError::Api {
            status: 409,
            message: "pods \"web\" already exists".to_string()
        }
    );
    assert!(err.is_api());
    server.await.unwrap();
}

#[tokio::test]
async fn refused_connection_is_a_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClusterClient::new(&format!("http://{}/", addr)).unwrap();
    let err = client.list_pods("default").await.unwrap_err();
    assert!(matches!(err, ClusterError::Connection(_)));
    assert!(!err.is_api());
}
