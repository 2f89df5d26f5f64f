use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use reqwest::StatusCode;
use serde_json::{Value, json};
use tempfile::TempDir;

use cinedex_infra::{DatabaseError, ExecOutcome, Gateway, Row, SqlGateway, SqlParam};

const SCHEMA: &[&str] = &[
    "CREATE TABLE movies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title VARCHAR(255) NOT NULL,
        director VARCHAR(255) NOT NULL,
        year INTEGER NOT NULL
    )",
    "CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        firstname VARCHAR(255) NOT NULL,
        lastname VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL UNIQUE,
        city VARCHAR(255) NOT NULL,
        language VARCHAR(255) NOT NULL
    )",
];

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
    _dir: Option<TempDir>,
}

impl TestServer {
    /// Real router over a fresh SQLite file.
    async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("api.db").display());
        let gateway = SqlGateway::connect(&url, 4).await.expect("failed to open sqlite");
        for ddl in SCHEMA {
            gateway.execute(ddl, &[]).await.expect("failed to create schema");
        }

        let mut srv = Self::spawn_with(Arc::new(gateway)).await;
        srv._dir = Some(dir);
        srv
    }

    /// Same router as prod, over any gateway, bound to an ephemeral port.
    async fn spawn_with(gateway: Arc<dyn Gateway>) -> Self {
        let app = cinedex_api::app::build_app(gateway);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
            _dir: None,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(body).send().await.unwrap()
    }

    async fn put(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client.put(self.url(path)).json(body).send().await.unwrap()
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client.delete(self.url(path)).send().await.unwrap()
    }

    /// POST `body` and return the generated id, asserting 201.
    async fn create(&self, path: &str, body: &Value) -> i64 {
        let res = self.post(path, body).await;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        assert_eq!(status, StatusCode::CREATED, "body={text}");
        let created: Value = serde_json::from_str(&text).unwrap();
        created["id"].as_i64().expect("id must be an integer")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn new_user() -> Value {
    json!({
        "firstname": "Marie",
        "lastname": "Martin",
        "email": format!("{}@wild.co", uuid::Uuid::now_v7()),
        "city": "Paris",
        "language": "French",
    })
}

fn new_movie() -> Value {
    json!({
        "title": "Citizen Kane",
        "director": "Orson Welles",
        "year": 1941,
    })
}

fn is_json(res: &reqwest::Response) -> bool {
    res.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("json"))
}

async fn assert_empty_404(res: reqwest::Response) {
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.text().await.unwrap().is_empty());
}

/// Gateway whose every statement fails, as a lost connection would.
struct FailingGateway;

#[async_trait::async_trait]
impl Gateway for FailingGateway {
    async fn fetch_all(&self, _sql: &str, _params: &[SqlParam]) -> Result<Vec<Row>, DatabaseError> {
        Err(DatabaseError::Other("connection lost".into()))
    }

    async fn execute(&self, _sql: &str, _params: &[SqlParam]) -> Result<ExecOutcome, DatabaseError> {
        Err(DatabaseError::Other("connection lost".into()))
    }
}

/// Gateway that only counts calls.
#[derive(Default)]
struct CountingGateway {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Gateway for CountingGateway {
    async fn fetch_all(&self, _sql: &str, _params: &[SqlParam]) -> Result<Vec<Row>, DatabaseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn execute(&self, _sql: &str, _params: &[SqlParam]) -> Result<ExecOutcome, DatabaseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ExecOutcome::default())
    }
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.get("/health").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_users_returns_json_array() {
    let srv = TestServer::spawn().await;
    srv.create("/api/users", &new_user()).await;

    let res = srv.get("/api/users").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(is_json(&res));
    let users: Value = res.json().await.unwrap();
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn created_user_round_trips() {
    let srv = TestServer::spawn().await;
    let user = json!({
        "firstname": "Marie",
        "lastname": "Martin",
        "email": "u1@x.co",
        "city": "Paris",
        "language": "French",
    });

    let id = srv.create("/api/users", &user).await;

    let res = srv.get(&format!("/api/users/{id}")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(is_json(&res));
    let got: Value = res.json().await.unwrap();
    assert_eq!(got["id"], json!(id));
    for field in ["firstname", "lastname", "email", "city", "language"] {
        assert_eq!(got[field], user[field], "{field}");
    }
}

#[tokio::test]
async fn unknown_ids_are_404_with_empty_body() {
    let srv = TestServer::spawn().await;
    assert_empty_404(srv.get("/api/users/0").await).await;
    assert_empty_404(srv.get("/api/movies/0").await).await;
}

#[tokio::test]
async fn non_numeric_id_addresses_nothing() {
    let srv = TestServer::spawn().await;
    assert_empty_404(srv.get("/api/users/abc").await).await;
    assert_empty_404(srv.delete("/api/movies/abc").await).await;
    assert_empty_404(srv.put("/api/movies/abc", &new_movie()).await).await;
}

#[tokio::test]
async fn partial_user_passes_validation_but_fails_in_database() {
    let srv = TestServer::spawn().await;

    let res = srv.post("/api/users", &json!({ "firstname": "Harry" })).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "internal_error");

    let users: Value = srv.get("/api/users").await.json().await.unwrap();
    assert!(users.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_user_is_422_and_not_created() {
    let srv = TestServer::spawn().await;
    let mut user = new_user();
    user["email"] = json!("not-an-email");
    user["lastname"] = json!("x".repeat(256));

    let res = srv.post("/api/users", &user).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    let fields: Vec<&str> = body["validationErrors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["email", "lastname"]);

    let users: Value = srv.get("/api/users").await.json().await.unwrap();
    assert!(users.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn validation_failures_never_reach_the_gateway() {
    let gateway = Arc::new(CountingGateway::default());
    let srv = TestServer::spawn_with(gateway.clone()).await;

    let res = srv.post("/api/users", &json!({ "email": "nope" })).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let res = srv.put("/api/movies/1", &json!({ "title": "" })).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn update_user_overwrites_every_field() {
    let srv = TestServer::spawn().await;
    let id = srv.create("/api/users", &new_user()).await;

    let updated = json!({
        "firstname": "dracula",
        "lastname": "titi",
        "email": format!("{}@wild.co", uuid::Uuid::now_v7()),
        "city": "dalton",
        "language": "chripiron",
    });
    let res = srv.put(&format!("/api/users/{id}"), &updated).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.text().await.unwrap().is_empty());

    let got: Value = srv.get(&format!("/api/users/{id}")).await.json().await.unwrap();
    for field in ["firstname", "lastname", "email", "city", "language"] {
        assert_eq!(got[field], updated[field], "{field}");
    }
}

#[tokio::test]
async fn partial_update_is_rejected_by_database() {
    let srv = TestServer::spawn().await;
    let id = srv.create("/api/users", &new_user()).await;

    let res = srv.put(&format!("/api/users/{id}"), &json!({ "firstname": "Harry " })).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let got: Value = srv.get(&format!("/api/users/{id}")).await.json().await.unwrap();
    assert_eq!(got["firstname"], "Marie");
}

#[tokio::test]
async fn update_and_delete_of_unknown_id_are_404() {
    let srv = TestServer::spawn().await;
    let user = json!({
        "firstname": "tutu",
        "lastname": "tata",
        "email": "cupa.tutu@gmail.com",
        "city": "paris",
        "language": "francais",
    });

    assert_empty_404(srv.put("/api/users/0", &user).await).await;
    assert_empty_404(srv.delete("/api/users/0").await).await;
    assert_empty_404(srv.put("/api/movies/0", &new_movie()).await).await;
    assert_empty_404(srv.delete("/api/movies/0").await).await;
}

#[tokio::test]
async fn delete_removes_user() {
    let srv = TestServer::spawn().await;
    let id = srv.create("/api/users", &new_user()).await;

    let res = srv.delete(&format!("/api/users/{id}")).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.text().await.unwrap().is_empty());

    assert_empty_404(srv.get(&format!("/api/users/{id}")).await).await;
}

#[tokio::test]
async fn movie_lifecycle() {
    let srv = TestServer::spawn().await;
    let movie = new_movie();
    let id = srv.create("/api/movies", &movie).await;

    let got: Value = srv.get(&format!("/api/movies/{id}")).await.json().await.unwrap();
    assert_eq!(got, json!({ "id": id, "title": "Citizen Kane", "director": "Orson Welles", "year": 1941 }));

    let replacement = json!({ "title": "Vertigo", "director": "Alfred Hitchcock", "year": 1958 });
    let res = srv.put(&format!("/api/movies/{id}"), &replacement).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let list: Value = srv.get("/api/movies").await.json().await.unwrap();
    assert_eq!(list, json!([{ "id": id, "title": "Vertigo", "director": "Alfred Hitchcock", "year": 1958 }]));

    assert_eq!(srv.delete(&format!("/api/movies/{id}")).await.status(), StatusCode::NO_CONTENT);
    assert_empty_404(srv.get(&format!("/api/movies/{id}")).await).await;
}

#[tokio::test]
async fn incomplete_movie_lists_every_missing_field() {
    let srv = TestServer::spawn().await;

    let res = srv.post("/api/movies", &json!({ "year": 1500 })).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    let fields: Vec<&str> = body["validationErrors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["title", "director", "year"]);

    let movies: Value = srv.get("/api/movies").await.json().await.unwrap();
    assert!(movies.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn database_failures_are_500_with_generic_body() {
    let srv = TestServer::spawn_with(Arc::new(FailingGateway)).await;

    for res in [
        srv.get("/api/movies").await,
        srv.get("/api/users/1").await,
        srv.post("/api/movies", &new_movie()).await,
        srv.put("/api/users/1", &new_user()).await,
        srv.delete("/api/users/1").await,
    ] {
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "error": "internal_error", "message": "internal server error" }));
    }
}

#[tokio::test]
async fn non_object_bodies_are_validated_as_empty_objects() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/api/movies"))
        .body("title=Alien")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    let fields: Vec<&str> = body["validationErrors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["title", "director", "year"]);

    let res = srv.put("/api/movies/1", &json!(["Alien", "Ridley Scott", 1979])).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn non_object_user_bodies_reach_the_database_as_empty_rows() {
    let srv = TestServer::spawn().await;

    let res = srv.post("/api/users", &json!([1, 2])).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "internal_error", "message": "internal server error" }));

    let id = srv.create("/api/users", &new_user()).await;
    let res = srv.client.put(srv.url(&format!("/api/users/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let users: Value = srv.get("/api/users").await.json().await.unwrap();
    assert_eq!(users.as_array().unwrap().len(), 1);
}
