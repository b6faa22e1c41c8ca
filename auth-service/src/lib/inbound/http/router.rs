use std::sync::Arc;
use std::time::Duration;

use auth::JwtHandler;
use axum::body::Body;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use config::ConfigError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::cookies::SessionCookiePolicy;
use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::signup::signup;
use super::middleware::expose_error_detail;
use super::middleware::require_session;
use crate::config::Config;
use crate::domain::user::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub jwt_handler: Arc<JwtHandler>,
    pub token_ttl: chrono::Duration,
    pub cookies: SessionCookiePolicy,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    jwt_handler: Arc<JwtHandler>,
    config: &Config,
) -> Result<Router, ConfigError> {
    let token_ttl = config.token_ttl()?;
    let state = AppState {
        auth_service,
        jwt_handler,
        token_ttl,
        cookies: SessionCookiePolicy::new(&config.cookie, config.environment, token_ttl),
    };

    let public_routes = Router::new()
        .route("/", get(health))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    // Request headers carry the session cookie and are never recorded.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    let mut router = Router::new().merge(public_routes).merge(protected_routes);

    if !config.environment.is_production() {
        router = router.layer(middleware::from_fn(expose_error_detail));
    }

    router = router.layer(trace_layer);

    if let Some(origin) = &config.server.frontend_url {
        router = router.layer(cors_layer(origin)?);
    }

    Ok(router.with_state(state))
}

fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = HeaderValue::from_str(origin)
        .map_err(|e| ConfigError::Message(format!("server.frontend_url: {}", e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}
