//! Scenario 1 (happy path) and scenario 5 (concurrent requests to the same
//! worker) from the end-to-end scenario list.

mod common;

use dispatch_test_utils::MockWorker;
use std::time::Duration;

#[tokio::test]
async fn worker_answers_a_routed_request() {
    let (http_addr, tcp_addr) = common::start_dispatcher(Duration::from_secs(10)).await;
    let mut worker =
        MockWorker::connect_and_register(tcp_addr, "stocks-worker", vec!["/stocks".to_owned()])
            .await
            .unwrap();

    let client_task = tokio::spawn({
        let url = format!("{}/stocks/AAPL", common::base_url(http_addr));
        async move { reqwest::Client::new().get(url).send().await.unwrap() }
    });

    let request = worker.recv_request().await.unwrap();
    let envelope: dispatch_protocol::RequestEnvelope =
        serde_json::from_slice(&request.msg).unwrap();
    assert_eq!(envelope.method, "GET");
    assert_eq!(envelope.path, "/stocks/AAPL");

    worker.respond_ok(request.request, br#"{"price":150}"#.to_vec()).await.unwrap();

    let response = client_task.await.unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert_eq!(body, r#"{"price":150}"#);
}

#[tokio::test]
async fn worker_echoes_a_posted_body() {
    let (http_addr, tcp_addr) = common::start_dispatcher(Duration::from_secs(10)).await;
    let mut worker =
        MockWorker::connect_and_register(tcp_addr, "echo-worker", vec!["/echo".to_owned()])
            .await
            .unwrap();

    let client_task = tokio::spawn({
        let url = format!("{}/echo", common::base_url(http_addr));
        async move {
            reqwest::Client::new().post(url).body("hello worker").send().await.unwrap()
        }
    });

    let request = worker.recv_request().await.unwrap();
    let envelope: dispatch_protocol::RequestEnvelope =
        serde_json::from_slice(&request.msg).unwrap();
    assert_eq!(envelope.body, b"hello worker");
    worker.respond_ok(request.request, envelope.body).await.unwrap();

    let response = client_task.await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "hello worker");
}

/// Scenario 5: 100 concurrent HTTP callers hit the same worker's path; every
/// response must be matched to the right caller by request-id, never
/// swapped.
#[tokio::test]
async fn concurrent_requests_to_the_same_worker_never_cross_wires() {
    let (http_addr, tcp_addr) = common::start_dispatcher(Duration::from_secs(10)).await;
    let mut worker =
        MockWorker::connect_and_register(tcp_addr, "echo-worker", vec!["/echo".to_owned()])
            .await
            .unwrap();

    const N: usize = 100;
    let base_url = common::base_url(http_addr);
    let mut client_tasks = Vec::with_capacity(N);
    for i in 0..N {
        let url = format!("{base_url}/echo/{i}");
        client_tasks.push(tokio::spawn(async move {
            let body = format!("payload-{i}");
            let resp = reqwest::Client::new().post(url).body(body.clone()).send().await.unwrap();
            (body, resp)
        }));
    }

    // Worker echoes each request back with its own body, verifying the
    // dispatcher stamped the matching request-id on the REQUEST frame.
    let echo_task = tokio::spawn(async move {
        for _ in 0..N {
            let request = worker.recv_request().await.unwrap();
            let envelope: dispatch_protocol::RequestEnvelope =
                serde_json::from_slice(&request.msg).unwrap();
            worker.respond_ok(request.request, envelope.body).await.unwrap();
        }
    });

    for task in client_tasks {
        let (sent_body, response) = task.await.unwrap();
        assert_eq!(response.status(), 200);
        let received_body = response.text().await.unwrap();
        assert_eq!(received_body, sent_body, "response must match the request that sent it");
    }
    echo_task.await.unwrap();
}
