#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use vidgen_api::auth::jwt::{generate_access_token, JwtConfig};
use vidgen_api::auth::password::hash_password;
use vidgen_api::background::StatusPoller;
use vidgen_api::config::{PollerConfig, ServerConfig};
use vidgen_api::router::build_app_router;
use vidgen_api::state::AppState;
use vidgen_api::ws::WsManager;
use vidgen_core::generation::{
    GeneratorError, OperationStatus, StartedOperation, VideoGenerator,
};
use vidgen_core::lifecycle::VideoStore;
use vidgen_db::models::user::{CreateUser, User};
use vidgen_db::repositories::UserRepo;
use vidgen_db::PgVideoStore;
use vidgen_events::EventBus;
use vidgen_veo::GeneratorConfig;

pub const TEST_PASSWORD: &str = "test_password_123";

// ---------------------------------------------------------------------------
// Generator double
// ---------------------------------------------------------------------------

/// In-process generator. `start` hands out `op-1`, `op-2`, ... unless a
/// failure is queued; `check` answers per handle and reports unknown
/// handles as still running.
#[derive(Default)]
pub struct FakeGenerator {
    next_op: Mutex<u32>,
    start_delay: Mutex<Option<Duration>>,
    start_failure: Mutex<Option<GeneratorError>>,
    statuses: Mutex<HashMap<String, OperationStatus>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    /// Make every `start` call take at least `delay`.
    pub fn delay_start(&self, delay: Duration) {
        *self.start_delay.lock().unwrap() = Some(delay);
    }

    pub fn fail_next_start(&self, error: GeneratorError) {
        *self.start_failure.lock().unwrap() = Some(error);
    }

    pub fn set_status(&self, handle: &str, status: OperationStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert(handle.to_string(), status);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoGenerator for FakeGenerator {
    async fn start(&self, prompt: &str) -> Result<StartedOperation, GeneratorError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let delay = *self.start_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.start_failure.lock().unwrap().take() {
            return Err(err);
        }
        let mut next = self.next_op.lock().unwrap();
        *next += 1;
        Ok(StartedOperation {
            operation_handle: Some(format!("op-{next}")),
        })
    }

    async fn check(&self, handle: &str) -> Result<OperationStatus, GeneratorError> {
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(handle)
            .cloned()
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 60,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        prompt_style_enhancement: true,
        jwt: test_jwt_config(),
        poller: PollerConfig::default(),
    }
}

fn test_generator_config() -> GeneratorConfig {
    GeneratorConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        model: "veo-test".to_string(),
        api_key: "AIzaTESTKEY0123456789xyz".to_string(),
        timeout_secs: 5,
        connect_timeout_secs: 1,
    }
}

/// Full router over the real Postgres store and the given generator.
pub fn build_test_app_with(pool: PgPool, generator: Arc<FakeGenerator>) -> Router {
    let config = test_config();
    let store: Arc<dyn VideoStore> = Arc::new(PgVideoStore::new(pool.clone()));
    let generator: Arc<dyn VideoGenerator> = generator;
    let event_bus = Arc::new(EventBus::default());

    let poller = Arc::new(StatusPoller::new(
        Arc::clone(&store),
        Arc::clone(&generator),
        Arc::clone(&event_bus),
        config.poller.poll_options(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::new(WsManager::new()),
        event_bus,
        store,
        generator,
        poller,
        generator_info: Arc::new(test_generator_config().info()),
    };

    build_app_router(state, &config)
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(FakeGenerator::default()))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and return it with a valid token.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> (User, String) {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        display_name: None,
        role: role.to_string(),
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
    let token = generate_access_token(user.id, &user.role, &test_jwt_config())
        .expect("token generation should succeed");
    (user, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}
