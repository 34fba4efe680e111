//! `POST /register`, `GET /clients`, `GET /healthz`, and scenario 6
//! (re-registration overrides the prior owner of a path).

mod common;

use dispatch_test_utils::MockWorker;
use std::time::Duration;

#[tokio::test]
async fn healthz_reports_ok() {
    let (http_addr, _tcp_addr) = common::start_dispatcher(Duration::from_secs(10)).await;
    let response = reqwest::Client::new()
        .get(format!("{}/healthz", common::base_url(http_addr)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

/// `/register` is a side-channel handshake that only hands back the TCP
/// port to dial — it must not install anything into the routing table by
/// itself (that only happens over the REG frame on the TCP connection).
#[tokio::test]
async fn register_endpoint_returns_tcp_port_without_touching_routing() {
    let (http_addr, tcp_addr) = common::start_dispatcher(Duration::from_secs(10)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/register", common::base_url(http_addr)))
        .json(&serde_json::json!({"client_id": "new-worker", "Paths": ["/new"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: dispatch_protocol::RegisterResponse = response.json().await.unwrap();
    assert_eq!(body.client_id, "new-worker");
    assert_eq!(body.paths, vec!["/new".to_owned()]);
    assert_eq!(body.tcp_port, tcp_addr.port());

    // No TCP REG frame was ever sent, so the path must still be unrouted.
    let lookup = reqwest::Client::new()
        .get(format!("{}/new/thing", common::base_url(http_addr)))
        .send()
        .await
        .unwrap();
    assert_eq!(lookup.status(), 404);
}

#[tokio::test]
async fn register_endpoint_rejects_empty_client_id() {
    let (http_addr, _tcp_addr) = common::start_dispatcher(Duration::from_secs(10)).await;
    let response = reqwest::Client::new()
        .post(format!("{}/register", common::base_url(http_addr)))
        .json(&serde_json::json!({"client_id": "", "Paths": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn clients_lists_registered_workers_and_their_paths() {
    let (http_addr, tcp_addr) = common::start_dispatcher(Duration::from_secs(10)).await;
    let _w1 = MockWorker::connect_and_register(tcp_addr, "w1", vec!["/a".to_owned()])
        .await
        .unwrap();
    let _w2 = MockWorker::connect_and_register(
        tcp_addr,
        "w2",
        vec!["/b".to_owned(), "/c".to_owned()],
    )
    .await
    .unwrap();

    let response = reqwest::Client::new()
        .get(format!("{}/clients", common::base_url(http_addr)))
        .send()
        .await
        .unwrap();
    let body: dispatch_protocol::ClientsResponse = response.json().await.unwrap();
    assert_eq!(body.total_clients, 2);
    let w2_entry = body.clients.iter().find(|c| c.client_id == "w2").unwrap();
    assert_eq!(w2_entry.registered_paths, vec!["/b".to_owned(), "/c".to_owned()]);
}

/// Scenario 6: W1 registers `/x`; W2 later registers `/x` too. New requests
/// route to W2. Closing W2 leaves `/x` unregistered even though W1 is
/// still connected — last-REG-wins is not "fall back to the previous
/// owner" on disconnect.
#[tokio::test]
async fn reregistration_overrides_and_disconnect_of_new_owner_unregisters() {
    let (http_addr, tcp_addr) = common::start_dispatcher(Duration::from_secs(10)).await;
    let mut w1 = MockWorker::connect_and_register(tcp_addr, "w1", vec!["/x".to_owned()])
        .await
        .unwrap();
    let mut w2 = MockWorker::connect_and_register(tcp_addr, "w2", vec!["/x".to_owned()])
        .await
        .unwrap();

    let client_task = tokio::spawn({
        let url = format!("{}/x/thing", common::base_url(http_addr));
        async move { reqwest::Client::new().get(url).send().await.unwrap() }
    });

    // Only w2 should see the request now; w1 must not observe anything.
    let request = w2.recv_request().await.unwrap();
    w2.respond_ok(request.request, b"from w2".to_vec()).await.unwrap();
    let response = client_task.await.unwrap();
    assert_eq!(response.text().await.unwrap(), "from w2");

    // w1 is still connected but owns nothing; disconnecting w2 removes the
    // route entirely rather than falling back to w1.
    w2.disconnect().await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let follow_up = reqwest::Client::new()
        .get(format!("{}/x/thing", common::base_url(http_addr)))
        .send()
        .await
        .unwrap();
    assert_eq!(follow_up.status(), 404);

    // w1's own connection is unaffected by w2's teardown.
    w1.send_frame(&dispatch_protocol::Frame::heartbeat(b"ping".to_vec())).await.unwrap();
    let ack = w1.recv_frame().await.unwrap();
    assert_eq!(ack.sub, dispatch_protocol::tag::HEARTBEAT_RESPONSE);
}
