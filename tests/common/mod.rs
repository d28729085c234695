#![allow(dead_code)]

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, delete, get, post, put};
use axum::{Json, Router};
use dashmap::DashMap;
use ecole::Config;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

pub const JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";
pub const PASSWORD: &str = "secret";

type Shared = Arc<MockBackend>;

/// Backend finto: stesse rotte del backend reale, dati in memoria e contatori
/// per verificare quali chiamate ha fatto il client
pub struct MockBackend {
    pub messages: Mutex<Vec<Value>>,
    pub collections: DashMap<&'static str, Vec<Value>>,
    /// Numero di prossimi `GET /messages/details` che rispondono 503
    pub failing_fetches: AtomicUsize,
    /// Status e corpo restituiti da tutte le rotte delle collezioni
    pub resource_failure: Mutex<Option<(u16, String)>>,
    /// Le liste rispondono 200 con un corpo non JSON
    pub garbage_lists: AtomicBool,
    pub message_fetches: AtomicUsize,
    pub message_posts: AtomicUsize,
    pub read_puts: AtomicUsize,
    pub class_posts: AtomicUsize,
    pub list_fetches: AtomicUsize,
    pub next_id: AtomicUsize,
    /// Frame ricevuti sul WebSocket, in ordine
    pub ws_frames: Mutex<Vec<Value>>,
    pub ws_auth_headers: Mutex<Vec<Option<String>>>,
    pub rest_auth_headers: Mutex<Vec<Option<String>>>,
    pub ws_push: broadcast::Sender<String>,
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub backend: Shared,
}

impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Invia un frame a tutti i client connessi
    pub fn push(&self, frame: Value) {
        let _ = self.backend.ws_push.send(frame.to_string());
    }
}

fn seed_messages() -> Vec<Value> {
    vec![
        json!({"_id": "m1", "senderId": "p1", "senderRole": "professeur", "receiverId": "42",
               "receiverRole": "eleve", "subject": "Devoir", "content": "Exercices 1 à 4",
               "date": "2024-03-01T08:00:00Z", "read": false}),
        json!({"_id": "m2", "senderId": "42", "senderRole": "eleve", "receiverId": "p1",
               "receiverRole": "professeur", "subject": "Question", "content": "Pour l'exercice 3 ?",
               "date": "2024-03-02T09:30:00Z", "read": true}),
        json!({"_id": "m3", "senderId": "a1", "senderRole": "admin", "receiverId": "p1",
               "receiverRole": "professeur", "subject": "Réunion", "content": "Conseil de classe jeudi",
               "date": "2024-03-03T16:00:00Z", "read": false}),
    ]
}

fn seed_collections() -> DashMap<&'static str, Vec<Value>> {
    let collections = DashMap::new();
    collections.insert(
        "professeurs",
        vec![json!({"_id": "p1", "nom": "Curie", "prenom": "Marie", "email": "curie@ecole.fr"})],
    );
    collections.insert(
        "eleves",
        vec![
            json!({"_id": "42", "nom": "Durand", "prenom": "Léa", "classeId": "c1"}),
            json!({"_id": "43", "nom": "Petit", "prenom": "Hugo", "classeId": "c1"}),
            json!({"_id": "44", "nom": "Roux", "prenom": "Inès", "classeId": "c2"}),
        ],
    );
    collections.insert(
        "classes",
        vec![json!({"_id": "c1", "nom": "5e A"}), json!({"_id": "c2", "nom": "5e B"})],
    );
    collections.insert(
        "admins",
        vec![json!({"_id": "a1", "nom": "Direction", "email": "direction@ecole.fr"})],
    );
    for name in ["parents", "cours", "exercices", "notes", "paiements"] {
        collections.insert(name, Vec::new());
    }
    collections
}

impl MockBackend {
    fn new() -> Self {
        let (ws_push, _) = broadcast::channel(32);
        Self {
            messages: Mutex::new(seed_messages()),
            collections: seed_collections(),
            failing_fetches: AtomicUsize::new(0),
            resource_failure: Mutex::new(None),
            garbage_lists: AtomicBool::new(false),
            message_fetches: AtomicUsize::new(0),
            message_posts: AtomicUsize::new(0),
            read_puts: AtomicUsize::new(0),
            class_posts: AtomicUsize::new(0),
            list_fetches: AtomicUsize::new(0),
            next_id: AtomicUsize::new(100),
            ws_frames: Mutex::new(Vec::new()),
            ws_auth_headers: Mutex::new(Vec::new()),
            rest_auth_headers: Mutex::new(Vec::new()),
            ws_push,
        }
    }

    fn new_id(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    pub fn fail_resources(&self, status: u16, body: &str) {
        *self.resource_failure.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn message(&self, id: &str) -> Option<Value> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .find(|m| m["_id"] == id)
            .cloned()
    }

    pub fn frames_named(&self, event: &str) -> Vec<Value> {
        self.ws_frames
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f["event"] == event)
            .cloned()
            .collect()
    }

    fn forced_failure(&self) -> Option<Response> {
        self.resource_failure
            .lock()
            .unwrap()
            .clone()
            .map(|(status, body)| {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, body).into_response()
            })
    }

    fn insert_message(&self, mut message: Value) -> Value {
        message["_id"] = json!(self.new_id("m"));
        message["read"] = json!(false);
        self.messages.lock().unwrap().push(message.clone());
        message
    }

    fn mark_read(&self, id: &str) -> Option<String> {
        let mut messages = self.messages.lock().unwrap();
        let message = messages.iter_mut().find(|m| m["_id"] == id)?;
        let read_at = "2024-03-04T10:00:00Z".to_string();
        message["read"] = json!(true);
        message["readAt"] = json!(read_at);
        Some(read_at)
    }

    /// Risposta del server a un frame ricevuto sul WebSocket
    fn react(&self, frame: &Value) -> Option<Value> {
        match frame["event"].as_str()? {
            "sendMessage" => {
                let stored = self.insert_message(frame["data"].clone());
                Some(json!({"event": "messageSent", "data": {"_id": stored["_id"]}}))
            }
            "markAsRead" => {
                let id = frame["data"]["messageId"].as_str()?;
                let read_at = self.mark_read(id)?;
                Some(json!({"event": "messageRead", "data": {"messageId": id, "readAt": read_at}}))
            }
            _ => None,
        }
    }
}

fn auth_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Identifiants invalides"})))
            .into_response();
    }
    match body["email"].as_str() {
        Some("prof@ecole.fr") => Json(json!({
            "token": create_test_jwt("p1", "professeur", JWT_SECRET),
            "user": {"_id": "p1", "role": "professeur", "nom": "Marie Curie"}
        }))
        .into_response(),
        Some("eleve@ecole.fr") => Json(json!({
            "user": {"id": "42", "role": "élève", "name": "Léa Durand", "classeId": "c1"}
        }))
        .into_response(),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({"message": "Identifiants invalides"})))
            .into_response(),
    }
}

async fn message_details(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path((user_id, _role)): Path<(String, String)>,
) -> Response {
    backend.message_fetches.fetch_add(1, Ordering::SeqCst);
    backend.rest_auth_headers.lock().unwrap().push(auth_header(&headers));

    let failing = backend
        .failing_fetches
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if failing {
        return (StatusCode::SERVICE_UNAVAILABLE, "unavailable").into_response();
    }

    let mine: Vec<Value> = backend
        .messages
        .lock()
        .unwrap()
        .iter()
        .filter(|m| m["senderId"] == user_id.as_str() || m["receiverId"] == user_id.as_str())
        .cloned()
        .collect();
    Json(mine).into_response()
}

async fn post_message(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    backend.message_posts.fetch_add(1, Ordering::SeqCst);
    let stored = backend.insert_message(body);
    (StatusCode::CREATED, Json(stored)).into_response()
}

async fn read_message(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    backend.read_puts.fetch_add(1, Ordering::SeqCst);
    match backend.mark_read(&id) {
        Some(_) => Json(json!({"message": "ok"})).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Message introuvable"}))).into_response(),
    }
}

async fn delete_message(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    let mut messages = backend.messages.lock().unwrap();
    let before = messages.len();
    messages.retain(|m| m["_id"] != id.as_str());
    if messages.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Message introuvable"}))).into_response();
    }
    Json(json!({"message": "Message supprimé"})).into_response()
}

async fn class_message(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    backend.class_posts.fetch_add(1, Ordering::SeqCst);
    let count = backend
        .collections
        .get("eleves")
        .map(|eleves| eleves.iter().filter(|e| e["classeId"] == body["classeId"]).count())
        .unwrap_or(0);
    Json(json!({"count": count})).into_response()
}

fn list_collection(backend: &MockBackend, name: &'static str) -> Response {
    backend.list_fetches.fetch_add(1, Ordering::SeqCst);
    if let Some(failure) = backend.forced_failure() {
        return failure;
    }
    if backend.garbage_lists.load(Ordering::SeqCst) {
        return "<html>not json</html>".into_response();
    }
    let items = backend
        .collections
        .get(name)
        .map(|items| items.clone())
        .unwrap_or_default();
    Json(items).into_response()
}

fn create_in(backend: &MockBackend, name: &'static str, mut body: Value) -> Response {
    if let Some(failure) = backend.forced_failure() {
        return failure;
    }
    body["_id"] = json!(backend.new_id(&name[..1]));
    backend.collections.entry(name).or_default().push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

fn update_in(backend: &MockBackend, name: &'static str, id: &str, mut body: Value) -> Response {
    if let Some(failure) = backend.forced_failure() {
        return failure;
    }
    let mut items = backend.collections.entry(name).or_default();
    match items.iter_mut().find(|item| item["_id"] == id) {
        Some(item) => {
            body["_id"] = json!(id);
            *item = body.clone();
            Json(body).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Introuvable"}))).into_response(),
    }
}

fn delete_in(backend: &MockBackend, name: &'static str, id: &str) -> Response {
    if let Some(failure) = backend.forced_failure() {
        return failure;
    }
    let mut items = backend.collections.entry(name).or_default();
    let before = items.len();
    items.retain(|item| item["_id"] != id);
    if items.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Introuvable"}))).into_response();
    }
    Json(json!({"message": "Supprimé"})).into_response()
}

/// Rotte CRUD di una collezione: lista, creazione, modifica e cancellazione
fn collection_routes(
    router: Router<Shared>,
    name: &'static str,
    list_path: &'static str,
    base_path: &'static str,
) -> Router<Shared> {
    let list: MethodRouter<Shared> =
        get(move |State(b): State<Shared>| async move { list_collection(&b, name) });
    let create: MethodRouter<Shared> = post(move |State(b): State<Shared>, Json(body): Json<Value>| async move {
        create_in(&b, name, body)
    });
    let item: MethodRouter<Shared> = put(
        move |State(b): State<Shared>, Path(id): Path<String>, Json(body): Json<Value>| async move {
            update_in(&b, name, &id, body)
        },
    )
    .merge(delete(move |State(b): State<Shared>, Path(id): Path<String>| async move {
        delete_in(&b, name, &id)
    }));

    let item_path = format!("{}/{{id}}", base_path);
    let router = if list_path == base_path {
        router.route(list_path, list.merge(create))
    } else {
        router.route(list_path, list).route(base_path, create)
    };
    router.route(&item_path, item)
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(backend): State<Shared>,
) -> Response {
    backend.ws_auth_headers.lock().unwrap().push(auth_header(&headers));
    ws.on_upgrade(move |socket| handle_socket(socket, backend))
}

async fn handle_socket(mut socket: WebSocket, backend: Shared) {
    let mut pushed = backend.ws_push.subscribe();
    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(WsMessage::Text(text))) => {
                    let Ok(frame) = serde_json::from_str::<Value>(text.as_str()) else {
                        continue;
                    };
                    backend.ws_frames.lock().unwrap().push(frame.clone());
                    if let Some(reply) = backend.react(&frame) {
                        if socket.send(WsMessage::Text(reply.to_string().into())).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(WsMessage::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            frame = pushed.recv() => match frame {
                Ok(frame) => {
                    if socket.send(WsMessage::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    }
}

fn create_router(backend: Shared) -> Router {
    let router = Router::new()
        .route("/login", post(login))
        .route("/messages", post(post_message))
        .route("/messages/details/{user_id}/{role}", get(message_details))
        .route("/messages/{id}", delete(delete_message))
        .route("/messages/{id}/read", put(read_message))
        .route("/api/messages/class", post(class_message))
        .route("/ws", get(ws_handler));

    let router = [
        ("professeurs", "/professeurs", "/professeurs"),
        ("eleves", "/eleves", "/eleves"),
        ("classes", "/classes", "/classes"),
        ("parents", "/parents", "/parents"),
        ("cours", "/cours", "/cours"),
        ("exercices", "/exercices", "/exercices"),
        ("notes", "/notes", "/notes"),
        ("paiements", "/paiements", "/paiements"),
        ("admins", "/api/admins/list", "/api/admins"),
    ]
    .into_iter()
    .fold(router, |router, (name, list_path, base_path)| {
        collection_routes(router, name, list_path, base_path)
    });

    router.with_state(backend)
}

/// Avvia il backend finto su una porta libera di localhost
pub async fn spawn_backend() -> TestServer {
    let backend = Arc::new(MockBackend::new());
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    let app = create_router(backend.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock backend crashed");
    });

    TestServer { addr, backend }
}

/// Configurazione che punta al backend finto, con backoff di 1ms
pub fn test_config(server: &TestServer, storage: &std::path::Path) -> Config {
    let base = server.base_url();
    let ws = server.ws_url();
    let storage = storage.display().to_string();
    Config::from_lookup(|key| match key {
        "API_BASE_URL" => Some(base.clone()),
        "WS_URL" => Some(ws.clone()),
        "STORAGE_PATH" => Some(storage.clone()),
        "REQUEST_TIMEOUT_SECS" => Some("5".to_string()),
        "REQUEST_RETRIES" => Some("3".to_string()),
        "RETRY_BASE_DELAY_MS" => Some("1".to_string()),
        "APP_ENV" => Some("test".to_string()),
        _ => None,
    })
    .expect("Test configuration must be valid")
}

/// Genera un JWT token per testing
///
/// # Returns
/// Token JWT valido per 24 ore
pub fn create_test_jwt(user_id: &str, role: &str, jwt_secret: &str) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Claims {
        id: String,
        role: String,
        exp: usize,
        iat: usize,
    }

    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        id: user_id.to_string(),
        role: role.to_string(),
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("Failed to create JWT token")
}

/// Attende che `condition` diventi vera, fino a 2 secondi
pub async fn wait_until<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..400 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}
