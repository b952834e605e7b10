//! End-to-end behavior of the operation facade against the mock backend.
//!
//! Each test starts its own backend on an ephemeral port and inspects the
//! requests it recorded, so header policy is checked on the wire.

use recipe_api_client::{
    ApiError, AuthSession, ClientConfig, Payload, RecipeClient, Request, TransportFailureKind,
};
use recipe_mock_backend::MockBackend;
use serde_json::json;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

async fn setup() -> (MockBackend, RecipeClient) {
    let backend = MockBackend::start().await.unwrap();
    let client = RecipeClient::with_config(ClientConfig::for_base_url(backend.base_url())).unwrap();
    (backend, client)
}

/// A base URL nothing listens on: bind an ephemeral port, then release it.
fn unreachable_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn search_is_public_even_with_a_token() {
    let (backend, client) = setup().await;
    client.set_token_provider(|| Some("abc123".to_string()));

    let payload = client.recipes().search("pasta").await.unwrap();

    let recipes = payload.recipe_list();
    assert_eq!(recipes.len(), 2);
    assert!(recipes.iter().all(|r| r.display_title().contains("Pasta")));

    let req = backend.last_request().await.unwrap();
    assert_eq!(req.method, "GET");
    assert_eq!(req.uri, "/recipes/search?q=pasta");
    assert_eq!(req.authorization, None);
    assert_eq!(req.content_type.as_deref(), Some("application/json"));
    assert_eq!(req.cookie, None);
}

#[tokio::test]
async fn search_query_is_url_encoded() {
    let (backend, client) = setup().await;

    let payload = client.recipes().search("tomato soup").await.unwrap();
    assert_eq!(payload.recipe_list().len(), 1);

    let req = backend.last_request().await.unwrap();
    assert_eq!(req.uri, "/recipes/search?q=tomato%20soup");
}

#[tokio::test]
async fn recipe_by_id_is_public() {
    let (backend, client) = setup().await;
    client.set_token_provider(|| Some("abc123".to_string()));

    let payload = client.recipes().get_by_id("3").await.unwrap();
    assert_eq!(payload.as_json().unwrap()["title"], "Tomato Soup");

    let req = backend.last_request().await.unwrap();
    assert_eq!(req.uri, "/recipes/3");
    assert_eq!(req.authorization, None);
}

#[tokio::test]
async fn missing_recipe_reports_detail_verbatim() {
    let (_backend, client) = setup().await;

    let err = client.recipes().get_by_id("999").await.unwrap_err();

    assert_eq!(err.to_string(), "not found");
    assert_eq!(err.status_code(), Some(404));
    match err {
        ApiError::Status { payload, .. } => {
            assert_eq!(payload, Payload::Json(json!({"detail": "not found"})));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn registered_token_is_sent_to_protected_routes() {
    let (backend, client) = setup().await;
    client.set_token_provider(|| Some("abc123".to_string()));

    // The backend does not know this token, but the header must still go out.
    let err = client.saved().list().await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid token");
    assert!(err.is_unauthorized());

    let req = backend.last_request().await.unwrap();
    assert_eq!(req.method, "GET");
    assert_eq!(req.uri, "/users/me/saved");
    assert_eq!(req.authorization.as_deref(), Some("Bearer abc123"));
}

#[tokio::test]
async fn no_token_means_no_auth_header() {
    let (backend, client) = setup().await;

    let err = client.saved().list().await.unwrap_err();
    assert_eq!(err.to_string(), "Not authenticated");

    let req = backend.last_request().await.unwrap();
    assert_eq!(req.authorization, None);
}

#[tokio::test]
async fn login_token_is_used_by_the_next_protected_call() {
    let (backend, client) = setup().await;
    backend.add_user("a@b.com", "secret").await;

    let session = AuthSession::new();
    client.set_token_provider(session.clone());

    let auth = client
        .auth()
        .login_into(&session, "a@b.com", "secret")
        .await
        .unwrap();
    let token = auth.access_token.clone().unwrap();
    assert_eq!(auth.user, Some(json!({"email": "a@b.com"})));

    let login_req = backend.last_request().await.unwrap();
    assert_eq!(login_req.uri, "/auth/login");
    assert_eq!(login_req.authorization, None);

    let saved = client.saved().list().await.unwrap();
    assert_eq!(saved, Payload::Json(json!([])));

    let req = backend.last_request().await.unwrap();
    assert_eq!(req.authorization, Some(format!("Bearer {token}")));
}

#[tokio::test]
async fn save_then_list_reflects_the_recipe() {
    let (backend, client) = setup().await;
    backend.add_user("a@b.com", "secret").await;
    let session = AuthSession::new();
    client.set_token_provider(session.clone());
    client
        .auth()
        .login_into(&session, "a@b.com", "secret")
        .await
        .unwrap();

    let saved = client.saved().save("2").await.unwrap();
    assert_eq!(saved.as_json().unwrap()["recipe_id"], "2");

    let list = client.saved().list().await.unwrap().recipe_list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id.as_deref(), Some("2"));

    let removed = client.saved().unsave("2").await.unwrap();
    assert_eq!(removed, Payload::Text(String::new()));
    assert!(client.saved().list().await.unwrap().recipe_list().is_empty());

    let requests = backend.requests().await;
    let delete = requests.iter().find(|r| r.method == "DELETE").unwrap();
    assert_eq!(delete.uri, "/users/me/saved/2");
    assert!(delete.authorization.is_some());
}

#[tokio::test]
async fn logout_is_reflected_on_the_next_call() {
    let (backend, client) = setup().await;
    backend.add_user("a@b.com", "secret").await;
    let session = AuthSession::new();
    client.set_token_provider(session.clone());
    client
        .auth()
        .login_into(&session, "a@b.com", "secret")
        .await
        .unwrap();
    client.saved().list().await.unwrap();

    session.logout();
    let err = client.saved().list().await.unwrap_err();
    assert_eq!(err.status_code(), Some(401));
    assert_eq!(backend.last_request().await.unwrap().authorization, None);
}

#[tokio::test]
async fn bad_credentials_leave_the_session_signed_out() {
    let (backend, client) = setup().await;
    backend.add_user("a@b.com", "secret").await;
    let session = AuthSession::new();

    let err = client
        .auth()
        .login_into(&session, "a@b.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn signup_without_token_does_not_sign_in() {
    let (_backend, client) = setup().await;
    let session = AuthSession::new();

    let response = client
        .auth()
        .signup_into(&session, "new@b.com", "pw")
        .await
        .unwrap();
    assert_eq!(response.access_token, None);
    assert_eq!(response.user, Some(json!({"email": "new@b.com"})));
    assert!(!session.is_authenticated());

    let err = client.auth().signup("new@b.com", "pw").await.unwrap_err();
    assert_eq!(err.to_string(), "Email already registered");
    assert_eq!(err.status_code(), Some(409));

    let session = AuthSession::new();
    client
        .auth()
        .login_into(&session, "new@b.com", "pw")
        .await
        .unwrap();
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn error_message_sources() {
    let (_backend, client) = setup().await;

    let message = |path: &'static str| {
        let client = client.clone();
        async move { client.get(path).await.unwrap_err().to_string() }
    };

    assert_eq!(message("/errors/message").await, "bad request message");
    assert_eq!(message("/errors/error").await, "bad input");
    assert_eq!(message("/errors/text").await, "upstream exploded");
    assert_eq!(message("/errors/empty").await, "HTTP 503");
    assert_eq!(message("/errors/malformed-error").await, "HTTP 502");
}

#[tokio::test]
async fn malformed_success_body_is_null() {
    let (_backend, client) = setup().await;

    let payload = client.get("/errors/malformed").await.unwrap();
    assert_eq!(payload, Payload::Null);
}

#[tokio::test]
async fn text_bodies_are_returned_as_text() {
    let (_backend, client) = setup().await;

    let payload = client.get("/").await.unwrap();
    assert_eq!(payload.as_text(), Some("recipe mock backend"));
}

#[tokio::test]
async fn paths_get_exactly_one_separating_slash() {
    let backend = MockBackend::start().await.unwrap();
    let client = RecipeClient::with_config(ClientConfig::for_base_url(format!(
        "{}//",
        backend.base_url()
    )))
    .unwrap();

    client.send(Request::get("recipes/1")).await.unwrap();
    client.send(Request::get("//recipes/2")).await.unwrap();

    let uris: Vec<_> = backend.requests().await.into_iter().map(|r| r.uri).collect();
    assert_eq!(uris, vec!["/recipes/1", "/recipes/2"]);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let (backend, client) = setup().await;

    let recipes = client.recipes();
    let (a, b, c) = tokio::join!(
        recipes.search("pasta"),
        recipes.get_by_id("999"),
        recipes.get_by_id("4"),
    );
    assert_eq!(a.unwrap().recipe_list().len(), 2);
    assert_eq!(b.unwrap_err().to_string(), "not found");
    assert_eq!(c.unwrap().as_json().unwrap()["title"], "Pancakes");
    assert_eq!(backend.requests().await.len(), 3);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_failure() {
    let base = unreachable_base();
    let client = RecipeClient::with_config(ClientConfig::for_base_url(base.clone())).unwrap();

    let err = client.recipes().search("pasta").await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(err.transport_kind(), Some(TransportFailureKind::Network));
    let message = err.to_string();
    assert!(message.contains(&format!("Backend base resolved to {base}")), "{message}");
    assert!(message.contains("Network error"), "{message}");

    // Same failure, same classification; the client keeps working.
    let again = client.recipes().search("pasta").await.unwrap_err();
    assert_eq!(again.transport_kind(), err.transport_kind());
}

#[tokio::test]
async fn probe_reports_health_endpoint() {
    let (backend, client) = setup().await;
    client.set_token_provider(|| Some("abc123".to_string()));

    let result = client.health().check().await;

    assert!(result.ok);
    assert_eq!(result.status, 200);
    assert_eq!(result.url, format!("{}/health", backend.base_url()));
    assert_eq!(result.body, Payload::Json(json!({"status": "ok"})));

    let req = backend.last_request().await.unwrap();
    assert_eq!(req.uri, "/health");
    assert_eq!(req.authorization, None);
}

#[tokio::test]
async fn probe_never_fails_when_unreachable() {
    let base = unreachable_base();
    let client = RecipeClient::with_config(ClientConfig::for_base_url(base.clone())).unwrap();

    let result = client.health().check().await;

    assert!(!result.ok);
    assert_eq!(result.status, 0);
    assert_eq!(result.url, format!("{base}/health"));
    assert!(result.body.is_null());
}

/// Read one request head and return its request line.
fn read_request_line(stream: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn probe_falls_back_to_origin_when_health_gets_no_response() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let server = thread::spawn(move || {
        let mut seen = Vec::new();

        // First connection: read the request, then hang up without answering.
        let (mut stream, _) = listener.accept().unwrap();
        seen.push(read_request_line(&mut stream));
        drop(stream);

        let (mut stream, _) = listener.accept().unwrap();
        seen.push(read_request_line(&mut stream));
        stream
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\nConnection: close\r\n\r\nup",
            )
            .unwrap();
        seen
    });

    let client = RecipeClient::with_config(ClientConfig::for_base_url(base.clone())).unwrap();
    let result = client.health().check().await;

    assert!(result.ok);
    assert_eq!(result.status, 200);
    assert_eq!(result.url, format!("{base}/"));
    assert_eq!(result.body, Payload::Text("up".to_string()));

    let seen = server.join().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].starts_with("GET /health "), "{seen:?}");
    assert!(seen[1].starts_with("GET / "), "{seen:?}");
}
