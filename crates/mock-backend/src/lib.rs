//! In-memory Recipe backend
//!
//! Implements the routes the API client consumes, with just enough behavior
//! to check it end to end: bearer-protected saved collections, token-issuing
//! login, and a few routes that fail in specific shapes. Every request is
//! recorded so tests can assert on what actually went over the wire.

#![warn(missing_docs)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

/// A request as the backend received it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    /// HTTP method, upper case
    pub method: String,
    /// Path with query string
    pub uri: String,
    /// `Authorization` header, if sent
    pub authorization: Option<String>,
    /// `Content-Type` header, if sent
    pub content_type: Option<String>,
    /// `Cookie` header, if sent
    pub cookie: Option<String>,
}

/// Seeded recipe, serialized with the field spellings real backends use
#[derive(Clone, Debug, Serialize)]
pub struct Recipe {
    /// String identifier
    pub id: String,
    /// Title
    pub title: String,
    /// Image URL, sent as `image_url`
    pub image_url: String,
    /// Preparation time, sent as `readyInMinutes`
    #[serde(rename = "readyInMinutes")]
    pub ready_in_minutes: u32,
    /// Servings
    pub servings: u32,
}

#[derive(Default)]
struct Store {
    users: HashMap<String, String>,
    tokens: HashMap<String, String>,
    saved: HashMap<String, Vec<String>>,
    recorded: Vec<RecordedRequest>,
}

/// Shared backend state: seed recipes plus users, tokens, saved lists and
/// the request log
#[derive(Clone)]
pub struct AppState {
    recipes: Arc<Vec<Recipe>>,
    store: Arc<RwLock<Store>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            recipes: Arc::new(seed_recipes()),
            store: Arc::new(RwLock::new(Store::default())),
        }
    }
}

impl AppState {
    /// Requests received so far, oldest first
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.store.read().await.recorded.clone()
    }

    /// Register a user directly
    pub async fn add_user(&self, email: &str, password: &str) {
        self.store
            .write()
            .await
            .users
            .insert(email.to_string(), password.to_string());
    }
}

fn seed_recipes() -> Vec<Recipe> {
    [
        ("1", "Pasta Carbonara", 25, 2),
        ("2", "Pasta Primavera", 30, 4),
        ("3", "Tomato Soup", 40, 4),
        ("4", "Pancakes", 15, 3),
    ]
    .into_iter()
    .map(|(id, title, ready, servings)| Recipe {
        id: id.to_string(),
        title: title.to_string(),
        image_url: format!("https://images.example/{id}.jpg"),
        ready_in_minutes: ready,
        servings,
    })
    .collect()
}

/// Router for every route the client consumes, with request recording
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/recipes/search", get(search))
        .route("/recipes/{id}", get(get_recipe))
        .route("/users/me/saved", get(list_saved).post(save_recipe))
        .route("/users/me/saved/{id}", delete(unsave_recipe))
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/errors/{kind}", get(error_shape))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

/// Serve [`app`] on an already bound listener until the task is dropped
pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

/// A backend serving on an ephemeral localhost port
pub struct MockBackend {
    addr: SocketAddr,
    state: AppState,
}

impl MockBackend {
    /// Bind `127.0.0.1:0` and serve in the background
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = AppState::default();
        let served = state.clone();
        tokio::spawn(async move { run(listener, served).await });
        Ok(Self { addr, state })
    }

    /// Bound socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://<addr>`, ready to hand to the client
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Backend state, for direct seeding
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Requests received so far, oldest first
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests().await
    }

    /// Most recent request
    pub async fn last_request(&self) -> Option<RecordedRequest> {
        self.state.requests().await.pop()
    }

    /// Register a user directly
    pub async fn add_user(&self, email: &str, password: &str) {
        self.state.add_user(email, password).await;
    }
}

async fn record(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let recorded = recorded_request(&req);
    debug!(method = %recorded.method, uri = %recorded.uri, "Mock request");
    state.store.write().await.recorded.push(recorded);
    next.run(req).await
}

fn recorded_request(req: &Request) -> RecordedRequest {
    let header_text = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    RecordedRequest {
        method: req.method().to_string(),
        uri: req
            .uri()
            .path_and_query()
            .map_or_else(|| req.uri().path().to_string(), ToString::to_string),
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        cookie: header_text(header::COOKIE),
    }
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<String, Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
    state
        .store
        .read()
        .await
        .tokens
        .get(token)
        .cloned()
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Invalid token"))
}

async fn root() -> &'static str {
    "recipe mock backend"
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Json<Value> {
    let needle = query.q.to_lowercase();
    let results: Vec<&Recipe> = state
        .recipes
        .iter()
        .filter(|r| r.title.to_lowercase().contains(&needle))
        .collect();
    Json(json!({ "results": results }))
}

async fn get_recipe(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.recipes.iter().find(|r| r.id == id) {
        Some(recipe) => Json(recipe.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "not found"),
    }
}

async fn list_saved(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user = match current_user(&state, &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };
    let store = state.store.read().await;
    let ids = store.saved.get(&user).cloned().unwrap_or_default();
    let recipes: Vec<&Recipe> = ids
        .iter()
        .filter_map(|id| state.recipes.iter().find(|r| &r.id == id))
        .collect();
    Json(json!(recipes)).into_response()
}

#[derive(Deserialize)]
struct SaveBody {
    recipe_id: Value,
}

async fn save_recipe(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SaveBody>,
) -> Response {
    let user = match current_user(&state, &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };
    let id = match body.recipe_id {
        Value::String(s) => s,
        other => other.to_string(),
    };
    if !state.recipes.iter().any(|r| r.id == id) {
        return detail(StatusCode::NOT_FOUND, "Recipe not found");
    }
    let mut store = state.store.write().await;
    let saved = store.saved.entry(user).or_default();
    if !saved.contains(&id) {
        saved.push(id.clone());
    }
    (StatusCode::CREATED, Json(json!({ "recipe_id": id, "saved": true }))).into_response()
}

async fn unsave_recipe(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let user = match current_user(&state, &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };
    let mut store = state.store.write().await;
    let saved = store.saved.entry(user).or_default();
    match saved.iter().position(|s| s == &id) {
        Some(pos) => {
            saved.remove(pos);
            StatusCode::NO_CONTENT.into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "Recipe was not saved"),
    }
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login(State(state): State<AppState>, Json(creds): Json<Credentials>) -> Response {
    let mut store = state.store.write().await;
    if store.users.get(&creds.email) != Some(&creds.password) {
        return detail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let token = format!("token-{}", Uuid::new_v4().simple());
    store.tokens.insert(token.clone(), creds.email.clone());
    Json(json!({ "access_token": token, "user": { "email": creds.email } })).into_response()
}

async fn signup(State(state): State<AppState>, Json(creds): Json<Credentials>) -> Response {
    let mut store = state.store.write().await;
    if creds.email.is_empty() || creds.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "email and password are required" })),
        )
            .into_response();
    }
    if store.users.contains_key(&creds.email) {
        return detail(StatusCode::CONFLICT, "Email already registered");
    }
    store.users.insert(creds.email.clone(), creds.password);
    (StatusCode::CREATED, Json(json!({ "user": { "email": creds.email } }))).into_response()
}

fn raw(status: StatusCode, content_type: &'static str, body: &'static str) -> Response {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

async fn error_shape(Path(kind): Path<String>) -> Response {
    match kind.as_str() {
        "message" => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "bad request message" })),
        )
            .into_response(),
        "error" => (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad input" }))).into_response(),
        "text" => raw(StatusCode::INTERNAL_SERVER_ERROR, "text/plain", "upstream exploded"),
        "empty" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        "malformed" => raw(StatusCode::OK, "application/json", "{not json"),
        "malformed-error" => raw(StatusCode::BAD_GATEWAY, "application/json", "{oops"),
        _ => detail(StatusCode::NOT_FOUND, "unknown error shape"),
    }
}
