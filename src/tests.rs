//! Integration tests for the Volunteer Hub backend.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::clock::SystemClock;
use crate::config::Config;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    db_path: std::path::PathBuf,
    _temp_dir: TempDir,
}

fn test_config(db_path: std::path::PathBuf) -> Config {
    Config {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
        storage_path: Some(db_path),
        auth_latency: Duration::ZERO,
        chat_broadcast_interval: Duration::ZERO,
        chat_echo_delay: Duration::from_millis(20),
        seed_events: true,
    }
}

async fn spawn_server(config: &Config) -> String {
    let state = AppState::build(config, Arc::new(SystemClock))
        .await
        .expect("Failed to build state");
    let app = create_router(state);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get addr");

    // Spawn server
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    format!("http://{}", addr)
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("local_storage.sqlite");
        let base_url = spawn_server(&test_config(db_path.clone())).await;

        TestFixture {
            client: Client::new(),
            base_url,
            db_path,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        (resp.status().as_u16(), resp.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        (resp.status().as_u16(), resp.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (u16, Value) {
        let resp = self.client.delete(self.url(path)).send().await.unwrap();
        (resp.status().as_u16(), resp.json().await.unwrap())
    }
}

fn event_ids(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_session_lifecycle() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/session").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["authenticated"], false);
    assert!(body["data"]["user"].is_null());

    let (status, body) = fixture
        .post(
            "/api/session/login",
            json!({ "email": "maria@example.com", "password": "pw", "role": "volunteer" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "maria");
    assert_eq!(body["data"]["email"], "maria@example.com");
    assert_eq!(body["data"]["role"], "volunteer");
    assert!(body["data"]["id"].as_str().unwrap().starts_with("user-"));

    let (_, body) = fixture.get("/api/session").await;
    assert_eq!(body["data"]["authenticated"], true);
    assert_eq!(body["data"]["user"]["email"], "maria@example.com");

    let (status, body) = fixture.post("/api/session/logout", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["authenticated"], false);

    let (_, body) = fixture.get("/api/session").await;
    assert_eq!(body["data"]["authenticated"], false);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/session/login",
            json!({ "email": "maria@example.com", "password": "", "role": "volunteer" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
    assert_eq!(body["error"]["message"], "Invalid login credentials");
}

#[tokio::test]
async fn test_register_invalid_data() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/session/register",
            json!({ "name": "", "email": "org@example.com", "password": "pw", "role": "organization" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "INVALID_REGISTRATION_DATA");

    let (status, body) = fixture
        .post(
            "/api/session/register",
            json!({ "name": "Green Org", "email": "org@example.com", "password": "pw", "role": "organization" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], "Green Org");
    assert_eq!(body["data"]["role"], "organization");
}

#[tokio::test]
async fn test_session_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("local_storage.sqlite");
    let config = test_config(db_path);

    let first = spawn_server(&config).await;
    let client = Client::new();
    let resp = client
        .post(format!("{}/api/session/login", first))
        .json(&json!({ "email": "org@example.com", "password": "pw", "role": "organization" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let second = spawn_server(&config).await;
    let body: Value = client
        .get(format!("{}/api/session", second))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["authenticated"], true);
    assert_eq!(body["data"]["user"]["role"], "organization");
}

#[tokio::test]
async fn test_list_and_browse_events() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/events").await;
    assert_eq!(status, 200);
    assert_eq!(
        event_ids(&body),
        ["event-1", "event-2", "event-3", "event-4", "event-5"]
    );
    assert_eq!(body["data"][0]["organizationName"], "EcoFriends");

    let (_, body) = fixture.get("/api/events?category=education&sort=name").await;
    assert_eq!(event_ids(&body), ["event-5", "event-3"]);

    let (_, body) = fixture.get("/api/events?search=park").await;
    assert_eq!(event_ids(&body), ["event-4"]);

    let (_, body) = fixture.get("/api/events?sort=spots").await;
    assert_eq!(event_ids(&body)[0], "event-1");
}

#[tokio::test]
async fn test_get_event_not_found() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/events/event-404").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "EVENT_NOT_FOUND");
    assert_eq!(body["error"]["message"], "Event not found");
}

#[tokio::test]
async fn test_registration_flow() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/events/event-1/registrations",
            json!({ "volunteerId": "user-3" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        body["data"]["volunteersRegistered"],
        json!(["user-1", "user-2", "user-3"])
    );

    let (status, body) = fixture
        .post(
            "/api/events/event-1/registrations",
            json!({ "volunteerId": "user-3" }),
        )
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], "ALREADY_REGISTERED");

    let (status, body) = fixture.delete("/api/events/event-1/registrations/user-1").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["volunteersRegistered"], json!(["user-2", "user-3"]));

    let (status, body) = fixture.delete("/api/events/event-1/registrations/user-1").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["volunteersRegistered"], json!(["user-2", "user-3"]));

    let (_, body) = fixture.get("/api/volunteers/user-3/events").await;
    assert_eq!(event_ids(&body), ["event-1", "event-2"]);

    let (status, _) = fixture
        .post(
            "/api/events/event-404/registrations",
            json!({ "volunteerId": "user-3" }),
        )
        .await;
    assert_eq!(status, 404);

    let (status, body) = fixture
        .post(
            "/api/events/event-1/registrations",
            json!({ "volunteerId": "  " }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_event() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/events",
            json!({
                "title": "River Cleanup",
                "description": "Pull trash from the riverbank",
                "organizationId": "org-7",
                "organizationName": "River Friends",
                "date": "2025-08-01T09:00:00",
                "location": "Mill Creek",
                "imageUrl": "https://example.com/river.jpg",
                "category": "environment",
                "volunteersNeeded": 12
            }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "upcoming");
    assert_eq!(body["data"]["volunteersRegistered"], json!([]));
    let event_id = body["data"]["id"].as_str().unwrap().to_string();
    assert!(event_id.starts_with("event-"));

    let (status, body) = fixture.get(&format!("/api/events/{}", event_id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["title"], "River Cleanup");

    let (_, body) = fixture.get("/api/organizations/org-7/events").await;
    assert_eq!(event_ids(&body), [event_id]);

    let (status, body) = fixture
        .post(
            "/api/events",
            json!({ "title": "No details", "organizationId": "org-7" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["message"], "Description is required");
}

#[tokio::test]
async fn test_create_event_attributed_to_signed_in_organization() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/session/login",
            json!({ "email": "team@harbor.org", "password": "pw", "role": "organization" }),
        )
        .await;
    assert_eq!(status, 200);
    let organization_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = fixture
        .post(
            "/api/events",
            json!({
                "title": "Harbor Sweep",
                "description": "Clear the docks",
                "date": "2025-09-10T08:00:00",
                "location": "Pier 4"
            }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["organizationId"], organization_id.as_str());
    assert_eq!(body["data"]["organizationName"], "team");
    assert_eq!(body["data"]["category"], "community");
    assert_eq!(body["data"]["volunteersNeeded"], 10);
    let event_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = fixture
        .get(&format!("/api/organizations/{}/events", organization_id))
        .await;
    assert_eq!(status, 200);
    assert_eq!(event_ids(&body), [event_id]);
}

#[tokio::test]
async fn test_chat_room_echo() {
    let fixture = TestFixture::new().await;

    let (status, _) = fixture
        .post("/api/chat/messages", json!({ "content": "too early" }))
        .await;
    assert_eq!(status, 400);

    let (status, body) = fixture.post("/api/chat/join", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["room"], "Beach Cleanup Volunteers");
    assert_eq!(body["data"]["connected"], true);
    assert_eq!(body["data"]["messages"].as_array().unwrap().len(), 3);

    fixture
        .post(
            "/api/session/login",
            json!({ "email": "sam@example.com", "password": "pw", "role": "volunteer" }),
        )
        .await;

    let (status, body) = fixture
        .post("/api/chat/messages", json!({ "content": " hi " }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["sender"], "sam");
    assert_eq!(body["data"]["content"], "hi");

    tokio::time::sleep(Duration::from_millis(200)).await;
    let (_, body) = fixture.get("/api/chat/messages").await;
    let messages = body["data"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[3]["content"], "hi");
    assert!(messages[3]["id"].as_str().unwrap().starts_with("msg-"));

    let (status, _) = fixture.post("/api/chat/leave", json!({})).await;
    assert_eq!(status, 200);

    let (status, _) = fixture
        .post("/api/chat/messages", json!({ "content": "after leave" }))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_storage_file_created() {
    let fixture = TestFixture::new().await;
    fixture
        .post(
            "/api/session/login",
            json!({ "email": "a@b.c", "password": "pw", "role": "volunteer" }),
        )
        .await;
    assert!(fixture.db_path.exists());
}
