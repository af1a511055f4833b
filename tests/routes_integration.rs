use menagerie::routes::create_router;
use menagerie::MemoryStore;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

// Test client wrapper for making API calls
struct TestClient {
    client: Client,
    base_url: String,
}

impl TestClient {
    fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn post(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn put(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .put(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn post_raw(&self, path: &str, body: &'static str) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&format!("{}{}", self.base_url, path))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
    }

    async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }

    async fn delete(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .delete(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }
}

/// Serve a fresh in-memory store on an ephemeral port.
async fn spawn_app(static_dir: &str) -> TestClient {
    let store = Arc::new(MemoryStore::new());
    let app = create_router::<MemoryStore>(static_dir).with_state(store);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestClient::new(format!("http://{}", address))
}

async fn seed_articles(client: &TestClient) {
    for (title, content) in [
        ("Test Article", "Test body"),
        ("Another Test Article", "Another test body"),
    ] {
        let response = client
            .post("/articles", json!({ "title": title, "content": content }))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_article_routes() {
    let client = spawn_app("public").await;

    println!("Empty list");
    let response = client.get("/articles").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let articles: Value = response.json().await.unwrap();
    assert_eq!(articles, json!([]));

    seed_articles(&client).await;

    println!("List in insertion order");
    let articles: Value = client.get("/articles").await.unwrap().json().await.unwrap();
    assert_eq!(articles[0]["content"], "Test body");
    assert_eq!(articles[1]["content"], "Another test body");

    println!("Get by id");
    let article: Value = client.get("/articles/1").await.unwrap().json().await.unwrap();
    assert_eq!(article["title"], "Test Article");
    assert_eq!(article["version"], 0);
    assert_eq!(article["snippet"], "Test body...");

    let response = client.get("/articles/74").await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Article not found: 74");

    println!("Filter by title");
    let filtered: Value = client
        .get("/articles?title=Another%20Test%20Article")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["id"], 2);
}

#[tokio::test]
async fn test_article_create_and_update() {
    let client = spawn_app("public").await;

    println!("Create");
    let response = client
        .post(
            "/articles",
            json!({
                "title": "Awesome POST-Created Article",
                "content": "Can you believe I did this in a test?",
                "tags": ["tag1", "tag2", "tag3"]
            }),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Created successfully");
    assert_eq!(body["article"]["title"], "Awesome POST-Created Article");
    assert_eq!(body["article"]["tags"], "tag1, tag2, tag3");
    let id = body["article"]["id"].as_i64().unwrap();

    println!("Create without content fails with 500");
    let response = client
        .post("/articles", json!({ "title": "This is a title" }))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "notNull Violation: content cannot be null");

    println!("Update");
    let response = client
        .put(
            &format!("/articles/{}", id),
            json!({ "title": "Awesome PUT-Updated Article" }),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Updated successfully");
    assert_eq!(body["article"]["title"], "Awesome PUT-Updated Article");
    assert_eq!(
        body["article"]["content"],
        "Can you believe I did this in a test?"
    );
    assert_eq!(body["article"]["version"], 1);

    let stored: Value = client
        .get(&format!("/articles/{}", id))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored["title"], "Awesome PUT-Updated Article");

    println!("Update with empty title fails with 500");
    let response = client
        .put(&format!("/articles/{}", id), json!({ "title": "" }))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    println!("Update with null title fails with 500");
    let response = client
        .put(&format!("/articles/{}", id), json!({ "title": null }))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "notNull Violation: title cannot be null");
    let stored: Value = client
        .get(&format!("/articles/{}", id))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored["title"], "Awesome PUT-Updated Article");
    assert_eq!(stored["version"], 1);

    let response = client
        .put("/articles/999", json!({ "title": "Nope" }))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    println!("Delete");
    let response = client.delete(&format!("/articles/{}", id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = client.get(&format!("/articles/{}", id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_article_author() {
    let client = spawn_app("public").await;
    seed_articles(&client).await;

    let user: Value = client
        .post("/users", json!({ "name": "Alatar the Blue" }))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let user_id = user["id"].as_i64().unwrap();

    let response = client
        .put("/articles/1/author", json!({ "userId": user_id }))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let linked: Value = response.json().await.unwrap();
    assert_eq!(linked["authorId"], user_id);
    assert_eq!(linked["author"]["name"], "Alatar the Blue");
    assert_eq!(linked["version"], 0);

    let loaded: Value = client
        .get("/articles/1?include=author")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(loaded["author"]["name"], "Alatar the Blue");

    let plain: Value = client.get("/articles/1").await.unwrap().json().await.unwrap();
    assert!(plain.get("author").is_none());

    println!("Filter by author");
    let authored: Value = client
        .get(&format!("/articles?authorId={}", user_id))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(authored.as_array().unwrap().len(), 1);
    assert_eq!(authored[0]["id"], 1);

    let response = client
        .put("/articles/1/author", json!({ "userId": 404 }))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_pokemon_and_trainer_routes() {
    let client = spawn_app("public").await;

    for (name, kind) in [("Pidgey", "flying"), ("Squirtle", "water"), ("Pidgey", "fire")] {
        let response = client
            .post("/pokemon", json!({ "name": name, "type": kind }))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    println!("Pokemon list and filter");
    let all: Value = client.get("/pokemon").await.unwrap().json().await.unwrap();
    assert_eq!(all.as_array().unwrap().len(), 3);
    let pidgeys: Value = client
        .get("/pokemon?name=Pidgey")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(pidgeys.as_array().unwrap().len(), 2);

    let squirtle: Value = client.get("/pokemon/2").await.unwrap().json().await.unwrap();
    assert_eq!(squirtle["type"], "water");

    println!("Trainer gains and loses pokemon");
    let trainer: Value = client
        .post("/trainers", json!({ "name": "Ash" }))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let trainer_id = trainer["id"].as_i64().unwrap();

    let response = client
        .put(&format!("/trainer/{}/pokemon/2", trainer_id), json!({}))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["name"], "Ash");
    assert_eq!(updated["pokemon"][0]["name"], "Squirtle");

    let trainers: Value = client.get("/trainers").await.unwrap().json().await.unwrap();
    assert_eq!(trainers[0]["name"], "Ash");
    assert_eq!(trainers[0]["pokemon"][0]["name"], "Squirtle");

    let response = client
        .put(&format!("/trainer/{}/pokemon/99", trainer_id), json!({}))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = client
        .put(&format!("/trainer/{}/pokemon/2/lose", trainer_id), json!({}))
        .await
        .unwrap();
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["pokemon"], json!([]));

    println!("Duplicate trainer name");
    let response = client
        .post("/trainers", json!({ "name": "Ash" }))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    println!("Delete pokemon");
    let response = client.delete("/pokemon/2").await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = client.delete("/pokemon/2").await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_payloads_map_to_500() {
    let client = spawn_app("public").await;

    println!("Wrongly typed field");
    let response = client
        .post("/articles", json!({ "title": "t", "content": 5 }))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to deserialize the JSON body"));

    println!("Malformed body");
    let response = client.post_raw("/articles", r#"{"title":"t","#).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let articles: Value = client.get("/articles").await.unwrap().json().await.unwrap();
    assert_eq!(articles, json!([]));
}

#[tokio::test]
async fn test_health_and_static_fallback() {
    let dir: PathBuf = std::env::temp_dir().join(format!("menagerie-static-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>menagerie</h1>").unwrap();

    let client = spawn_app(dir.to_str().unwrap()).await;

    let health: Value = client.get("/health").await.unwrap().json().await.unwrap();
    assert_eq!(health["status"], "healthy");

    let response = client.get("/index.html").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "<h1>menagerie</h1>");

    let response = client.get("/no-such-file.txt").await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    std::fs::remove_dir_all(&dir).ok();
}
