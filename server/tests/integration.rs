use axum::http::StatusCode;
use creator_hub::{
    api::{build_router, AppState},
    config::Config,
};
use serde_json::{json, Value};
use std::net::{SocketAddr, TcpListener};
use tokio::task::JoinHandle;

async fn spawn_server(seed: bool) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();

    let config = Config {
        bind: addr.to_string(),
        logging_enabled: false,
        seed_sample_data: seed,
    };
    let app = build_router(AppState::new(config).unwrap());
    let server = tokio::spawn(async move {
        axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service())
            .await
            .unwrap();
    });
    (addr, server)
}

async fn register(client: &reqwest::Client, addr: SocketAddr, username: &str) -> u32 {
    let resp = client
        .post(format!("http://{}/api/creators", addr))
        .json(&json!({
            "name": username,
            "username": username,
            "email": format!("{username}@example.com"),
            "platform": "instagram"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json::<Value>().await.unwrap()["id"].as_u64().unwrap() as u32
}

#[tokio::test]
async fn catalog_endpoints() {
    let (addr, server) = spawn_server(true).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("http://{}/api/health", addr)).send().await.unwrap();
    assert_eq!(resp.text().await.unwrap(), "ok");

    let creators: Vec<Value> = client
        .get(format!("http://{}/api/creators", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(creators.len(), 6);
    assert_eq!(creators[0]["username"], "priyasharma");

    let services: Vec<Value> = client
        .get(format!("http://{}/api/creators/2/services", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(services.len(), 2);
    assert!(services.iter().all(|s| s["creatorId"] == 2));

    let resp = client
        .get(format!("http://{}/api/creators/42/services", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "creator not found: 42");

    // service 3 belongs to creator 2, not creator 1
    let resp = client
        .get(format!("http://{}/api/creators/1/services/3", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .post(format!("http://{}/api/creators/1/services", addr))
        .json(&json!({
            "title": "Reel",
            "description": "One 30s reel",
            "price": 12000,
            "deliveryDays": 4,
            "deliverables": ["1 Reel", "Raw footage"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["id"], 10);
    assert_eq!(created["creatorId"], 1);

    let resp = client
        .patch(format!("http://{}/api/creators/1/services/10", addr))
        .json(&json!({"title": "Renamed", "description": "x", "price": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["title"], "Reel");

    let testimonials: Vec<Value> = client
        .get(format!("http://{}/api/testimonials", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(testimonials.len(), 3);

    let resp = client
        .post(format!("http://{}/api/testimonials", addr))
        .json(&json!({"name": "Kiran", "platform": "youtube", "content": "Solid", "rating": 9}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    server.abort();
}

#[tokio::test]
async fn contact_form() {
    let (addr, server) = spawn_server(false).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{}/api/contact", addr))
        .json(&json!({
            "name": "Meera",
            "email": "meera@example.com",
            "subject": "Brand deal",
            "message": "We'd like to work with you"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Message sent successfully");
    assert_eq!(body["id"], 1);

    let resp = client
        .post(format!("http://{}/api/contact", addr))
        .json(&json!({"name": "Meera", "email": "nope", "subject": "s", "message": "m"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    server.abort();
}

#[tokio::test]
async fn messaging_flow() {
    let (addr, server) = spawn_server(false).await;
    let client = reqwest::Client::new();

    let alice = register(&client, addr, "alice").await;
    let bob = register(&client, addr, "bob").await;
    let carol = register(&client, addr, "carol").await;

    let resp = client
        .post(format!("http://{}/api/creators", addr))
        .json(&json!({"name": "A", "username": "alice", "email": "x@example.com", "platform": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .post(format!("http://{}/api/creators", addr))
        .json(&json!({"name": "B", "username": "bobby", "email": " BOB@example.com ", "platform": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "email is already registered");

    let started: Value = client
        .post(format!("http://{}/api/conversations", addr))
        .json(&json!({"creator1Id": alice, "creator2Id": bob}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let conv_id = started["conversation"]["id"].as_u64().unwrap();
    assert_eq!(conv_id, 1);
    assert_eq!(started["otherCreator"]["username"], "bob");

    let again: Value = client
        .post(format!("http://{}/api/conversations", addr))
        .json(&json!({"creator1Id": bob, "creator2Id": alice}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(again["conversation"]["id"], conv_id);
    assert_eq!(again["otherCreator"]["username"], "alice");

    let resp = client
        .post(format!("http://{}/api/conversations", addr))
        .json(&json!({"creator1Id": alice, "creator2Id": 99}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .post(format!("http://{}/api/conversations/{}/messages", addr, conv_id))
        .json(&json!({"senderId": alice, "content": "hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let msg: Value = resp.json().await.unwrap();
    assert_eq!(msg["receiverId"], bob);
    assert_eq!(msg["read"], false);

    let unread: Value = client
        .get(format!("http://{}/api/creators/{}/unread", addr, bob))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(unread["count"], 1);

    let list: Vec<Value> = client
        .get(format!("http://{}/api/creators/{}/conversations", addr, bob))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["unreadCount"], 1);
    assert_eq!(list[0]["otherCreator"]["id"], alice);
    assert_eq!(list[0]["lastMessage"]["content"], "hello");
    assert_eq!(list[0]["lastMessage"]["isFromOtherPerson"], true);
    assert_eq!(list[0]["creator1Id"], alice);

    let detail: Value = client
        .get(format!(
            "http://{}/api/conversations/{}/messages?creatorId={}",
            addr, conv_id, bob
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["messages"][0]["read"], true);
    assert_eq!(detail["otherCreator"]["id"], alice);

    let unread: Value = client
        .get(format!("http://{}/api/creators/{}/unread", addr, bob))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(unread["count"], 0);

    let resp = client
        .get(format!(
            "http://{}/api/conversations/{}/messages?creatorId={}",
            addr, conv_id, carol
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .post(format!("http://{}/api/conversations/{}/messages", addr, conv_id))
        .json(&json!({"senderId": carol, "content": "let me in"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .post(format!("http://{}/api/conversations/{}/messages", addr, conv_id))
        .json(&json!({"senderId": bob, "content": "x".repeat(2001)}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .post(format!("http://{}/api/conversations/7/messages", addr))
        .json(&json!({"senderId": bob, "content": "hi"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    server.abort();
}
