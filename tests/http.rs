//! End-to-end tests: a real server on a loopback port, driven by reqwest.

use std::path::PathBuf;
use std::time::Duration;

use pantry::{AppState, Assets, RunningServer, Server, app};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use uuid::Uuid;

struct TestApp {
    base: String,
    client: Client,
    server: RunningServer,
    assets_root: PathBuf,
}

impl TestApp {
    async fn spawn() -> Self {
        let assets_root = std::env::temp_dir().join(format!("pantry-http-{}", Uuid::new_v4()));
        std::fs::create_dir_all(assets_root.join("public")).unwrap();
        std::fs::write(assets_root.join("index.html"), "<!doctype html><h1>Shopping List</h1>").unwrap();
        std::fs::write(assets_root.join("public/app.js"), "console.log('hi');").unwrap();

        let state = AppState::seeded();
        let assets = Assets::new(assets_root.join("public"), assets_root.join("index.html"));
        let server = Server::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", server.local_addr());
        let server = server.start(app::router(&state, assets));

        Self { base, client: Client::new(), server, assets_root }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn list(&self, resource: &str) -> Vec<Value> {
        let res = self.client.get(self.url(resource)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        res.json().await.unwrap()
    }

    async fn stop(self) {
        self.server.stop().await.unwrap();
        let _ = std::fs::remove_dir_all(&self.assets_root);
    }
}

#[tokio::test]
async fn shopping_list_get_returns_seeded_items() {
    let app = TestApp::spawn().await;

    let res = app.client.get(app.url("/shopping-list")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "application/json");

    let items: Vec<Value> = res.json().await.unwrap();
    assert!(items.len() >= 3);
    for item in &items {
        assert!(item.is_object());
        for key in ["id", "name", "checked"] {
            assert!(item.get(key).is_some());
        }
    }

    app.stop().await;
}

#[tokio::test]
async fn shopping_list_post_put_delete() {
    let app = TestApp::spawn().await;

    let res = app
        .client
        .post(app.url("/shopping-list"))
        .json(&json!({ "name": "coffee", "checked": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_owned();
    assert_eq!(created, json!({ "name": "coffee", "checked": false, "id": id }));

    let updated = json!({ "name": "foo", "checked": true, "id": id });
    let res = app
        .client
        .put(app.url(&format!("/shopping-list/{id}")))
        .json(&updated)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), updated);
    assert!(app.list("/shopping-list").await.contains(&updated));

    let res = app.client.delete(app.url(&format!("/shopping-list/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await.unwrap().is_empty());
    assert_eq!(app.list("/shopping-list").await.len(), 3);

    app.stop().await;
}

#[tokio::test]
async fn shopping_list_delete_unknown_id_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app
        .client
        .delete(app.url(&format!("/shopping-list/{}", Uuid::new_v4())))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    app.stop().await;
}

#[tokio::test]
async fn recipes_post_bread() {
    let app = TestApp::spawn().await;
    let before: Vec<String> = app
        .list("/recipes")
        .await
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_owned())
        .collect();

    let bread = json!({ "name": "bread", "ingredients": ["flour", "yeast", "sugar", "butter"] });
    let res = app.client.post(app.url("/recipes")).json(&bread).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.unwrap();
    let id = body["id"].as_str().unwrap();
    assert!(!before.iter().any(|existing| existing == id));
    assert_eq!(
        body,
        json!({ "id": id, "name": "bread", "ingredients": ["flour", "yeast", "sugar", "butter"] }),
    );

    app.stop().await;
}

#[tokio::test]
async fn recipes_put_and_delete() {
    let app = TestApp::spawn().await;
    let first = app.list("/recipes").await.remove(0);
    let id = first["id"].as_str().unwrap();

    let updated = json!({
        "name": "General Tso's Chicken",
        "ingredients": ["Chicken", "Awesome Sauce", "Broccoli"],
        "id": id,
    });
    let res = app.client.put(app.url(&format!("/recipes/{id}"))).json(&updated).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), updated);

    let res = app.client.delete(app.url(&format!("/recipes/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app.client.put(app.url(&format!("/recipes/{id}"))).json(&updated).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    app.stop().await;
}

#[tokio::test]
async fn invalid_payload_is_bad_request() {
    let app = TestApp::spawn().await;

    let res = app
        .client
        .post(app.url("/recipes"))
        .header("content-type", "application/json")
        .body("{\"name\": \"bread\", \"ingredients\": \"flour\"}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
    assert_eq!(app.list("/recipes").await.len(), 2);

    app.stop().await;
}

#[tokio::test]
async fn landing_page_static_files_and_fallthrough() {
    let app = TestApp::spawn().await;

    let res = app.client.get(app.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/html");
    assert!(res.text().await.unwrap().contains("Shopping List"));

    let res = app.client.get(app.url("/app.js")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res.headers()["content-type"].to_str().unwrap();
    assert!(content_type.contains("javascript"), "got {content_type}");

    let res = app.client.patch(app.url("/recipes")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.client.get(app.url("/missing.css")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    app.stop().await;
}

#[tokio::test]
async fn stopped_server_refuses_connections() {
    let app = TestApp::spawn().await;
    let client = app.client.clone();
    let url = app.url("/shopping-list");

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    app.stop().await;
    assert!(Client::new().get(&url).send().await.is_err());
}

#[tokio::test]
async fn stop_closes_idle_keep_alive_connections() {
    let app = TestApp::spawn().await;
    let addr = app.server.local_addr();
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream
        .write_all(b"GET /shopping-list HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    // Read one full response so the connection sits idle in keep-alive.
    let mut received = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).await.unwrap();
        assert_ne!(n, 0, "server closed the connection before answering");
        received.extend_from_slice(&buf[..n]);
        if let Some(end) = received.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&received[..end]).to_ascii_lowercase();
            let length: usize = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map(|v| v.trim().parse().unwrap())
                .unwrap();
            if received.len() >= end + 4 + length {
                assert!(head.starts_with("http/1.1 200"));
                break;
            }
        }
    }

    app.stop().await;

    let next = tokio::time::timeout(Duration::from_secs(5), stream.read(&mut buf))
        .await
        .expect("connection stayed open after stop");
    assert!(matches!(next, Ok(0) | Err(_)), "got {next:?}");
}
