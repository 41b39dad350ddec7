#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use librairie_api::auth::jwt::{generate_access_token, JwtConfig};
use librairie_api::auth::password::hash_password;
use librairie_api::config::{PaymentSettings, ServerConfig};
use librairie_api::router::build_app_router;
use librairie_api::state::AppState;
use librairie_api::storage::UploadStore;
use librairie_db::models::user::{CreateUser, UserResponse};
use librairie_db::repositories::{RoleRepo, UserRepo};
use librairie_events::{EmailError, Mailer};
use librairie_payment::{
    GatewayTransaction, NewPayment, PaymentError, PaymentGateway, PaymentLink,
};

/// Password given to every user created through [`create_user`].
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Transaction id the stub gateway assigns to the first opened payment.
pub const FIRST_TRANSACTION_ID: i64 = 1001;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config(upload_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            expiry_mins: 60,
        },
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 5 * 1024 * 1024,
        payment: PaymentSettings {
            callback_url: "http://localhost:3000/api/payment/callback".to_string(),
            currency: "XOF".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Mailer that keeps every message in memory.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

/// Mailer whose relay is always down.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _to: &str, _subject: &str, _html: &str) -> Result<(), EmailError> {
        Err(EmailError::Build("relay unavailable".into()))
    }
}

/// In-memory payment gateway.
///
/// Opened transactions get sequential ids starting at
/// [`FIRST_TRANSACTION_ID`]; `retrieve` reports whatever status was last set
/// with [`StubGateway::settle`].
pub struct StubGateway {
    opened: Mutex<Vec<NewPayment>>,
    status: Mutex<String>,
    withdraw_books: Mutex<Option<PgPool>>,
}

impl Default for StubGateway {
    fn default() -> Self {
        Self {
            opened: Mutex::new(Vec::new()),
            status: Mutex::new("pending".to_string()),
            withdraw_books: Mutex::new(None),
        }
    }
}

impl StubGateway {
    pub fn opened(&self) -> Vec<NewPayment> {
        self.opened.lock().unwrap().clone()
    }

    pub fn settle(&self, status: &str) {
        *self.status.lock().unwrap() = status.to_string();
    }

    /// Delete every book while the next transactions are being opened, so
    /// the local insert that follows fails.
    pub fn withdraw_books_on_open(&self, pool: PgPool) {
        *self.withdraw_books.lock().unwrap() = Some(pool);
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_transaction(
        &self,
        payment: &NewPayment,
    ) -> Result<GatewayTransaction, PaymentError> {
        let id = {
            let mut opened = self.opened.lock().unwrap();
            opened.push(payment.clone());
            FIRST_TRANSACTION_ID + opened.len() as i64 - 1
        };
        let withdraw = self.withdraw_books.lock().unwrap().clone();
        if let Some(pool) = withdraw {
            sqlx::query("DELETE FROM books").execute(&pool).await.unwrap();
        }
        Ok(GatewayTransaction {
            id,
            status: "pending".to_string(),
            details: serde_json::Map::new(),
        })
    }

    async fn generate_token(&self, transaction_id: i64) -> Result<PaymentLink, PaymentError> {
        Ok(PaymentLink {
            token: format!("tok_{transaction_id}"),
            url: format!("https://checkout.test/pay/tok_{transaction_id}"),
        })
    }

    async fn retrieve(&self, transaction_id: i64) -> Result<GatewayTransaction, PaymentError> {
        let mut details = serde_json::Map::new();
        details.insert("reference".into(), serde_json::json!(format!("ref-{transaction_id}")));
        Ok(GatewayTransaction {
            id: transaction_id,
            status: self.status.lock().unwrap().clone(),
            details,
        })
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// A fully wired application plus handles on its test doubles.
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub config: ServerConfig,
    pub mailer: Arc<RecordingMailer>,
    pub gateway: Arc<StubGateway>,
    uploads: TempDir,
}

impl TestApp {
    /// A fresh handle on the router (each `oneshot` consumes one).
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn upload_root(&self) -> &std::path::Path {
        self.uploads.path()
    }

    /// Mint a token for an existing user without going through `/login`.
    pub fn token_for(&self, user: &UserResponse) -> String {
        generate_access_token(user.id, &user.role, &self.config.jwt)
            .expect("token generation should succeed")
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool, a temporary upload directory and in-memory mail and
/// payment doubles.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let mailer = Arc::new(RecordingMailer::default());
    build_with_mailer(pool, mailer.clone(), mailer)
}

/// Like [`build_test_app`], but every email delivery fails.
pub fn build_test_app_with_failing_mailer(pool: PgPool) -> TestApp {
    build_with_mailer(
        pool,
        Arc::new(FailingMailer),
        Arc::new(RecordingMailer::default()),
    )
}

fn build_with_mailer(
    pool: PgPool,
    mailer: Arc<dyn Mailer>,
    recording: Arc<RecordingMailer>,
) -> TestApp {
    let uploads = tempfile::tempdir().expect("tempdir should be created");
    let config = test_config(uploads.path());
    let gateway = Arc::new(StubGateway::default());

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        mailer,
        payments: gateway.clone(),
        uploads: Arc::new(UploadStore::new(uploads.path())),
    };

    TestApp {
        router: build_app_router(state, &config),
        pool,
        config,
        mailer: recording,
        gateway,
        uploads,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with the given role directly, bypassing the API.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> UserResponse {
    let role = RoleRepo::find_by_name(pool, role)
        .await
        .unwrap()
        .expect("role should be seeded");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Test".to_string(),
            surname: "User".to_string(),
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role_id: role.id,
        },
    )
    .await
    .expect("user creation should succeed");
    UserRepo::find_response_by_id(pool, user.id)
        .await
        .unwrap()
        .expect("user should exist")
}

/// Create a user with the given role and return it with a valid token.
pub async fn user_with_token(app: &TestApp, email: &str, role: &str) -> (UserResponse, String) {
    let user = create_user(&app.pool, email, role).await;
    let token = app.token_for(&user);
    (user, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::PUT, uri, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "----librairie-test-boundary";

/// Builds a `multipart/form-data` body by hand.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    form: MultipartForm,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(form.finish()))
        .unwrap();
    send(app, request).await
}

/// Sample cover bytes (PNG signature; contents are never decoded).
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-a-real-image";

/// Sample PDF bytes.
pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n% test book\n%%EOF\n";

/// A complete, valid book upload form for the given category.
pub fn book_form(title: &str, category_id: i64) -> MultipartForm {
    MultipartForm::default()
        .text("title", title)
        .text("description", "A test book")
        .text("author", "Jane Writer")
        .text("price", "2500")
        .text("stock", "10")
        .text("category_id", &category_id.to_string())
        .file("image", "cover.png", "image/png", PNG_BYTES)
        .file("pdf", "book.pdf", "application/pdf", PDF_BYTES)
}
