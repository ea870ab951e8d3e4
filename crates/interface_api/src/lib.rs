//! HTTP API Layer
//!
//! REST and server-sent-event surface of the claims tracker, built on Axum.
//!
//! # Architecture
//!
//! - **Handlers**: claims, users, live notification streams, health probes
//! - **Middleware**: request ids, tracing, audit logging
//! - **DTOs**: camelCase request/response bodies
//! - **Error Handling**: one JSON error shape for every failure
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(lifecycle, users, hub, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_claims::ClaimLifecycle;
use domain_users::UserService;
use infra_notify::BroadcastHub;

use crate::config::ApiConfig;
use crate::handlers::{claims, health, notifications, users};
use crate::middleware::{audit_middleware, REQUEST_ID_HEADER};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: ClaimLifecycle,
    pub users: UserService,
    pub hub: BroadcastHub,
    pub health_checks: Vec<Arc<dyn HealthCheckable>>,
    pub config: ApiConfig,
}

impl AppState {
    /// Creates state with no registered health checks
    pub fn new(
        lifecycle: ClaimLifecycle,
        users: UserService,
        hub: BroadcastHub,
        config: ApiConfig,
    ) -> Self {
        Self {
            lifecycle,
            users,
            hub,
            health_checks: Vec::new(),
            config,
        }
    }

    /// Registers an adapter for the readiness probe
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheckable>) -> Self {
        self.health_checks.push(check);
        self
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let claims_routes = Router::new()
        .route("/", post(claims::create_claim).get(claims::list_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/review", put(claims::review_claim))
        .route("/user/:user_id", get(claims::list_claims_by_user))
        .route("/status/:status", get(claims::list_claims_by_status))
        .route("/number/:claim_number", get(claims::get_claim_by_number));

    let user_routes = Router::new()
        .route("/", post(users::create_user).get(users::list_users))
        .route("/:id", get(users::get_user))
        .route("/username/:username", get(users::get_user_by_username))
        .route("/role/:role", get(users::list_users_by_role));

    let notification_routes = Router::new()
        .route("/user/:user_id", get(notifications::user_stream))
        .route("/admin", get(notifications::admin_stream));

    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .nest("/users", user_routes)
        .nest("/notifications", notification_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
