use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use domain::bridge::{HostOptions, OriginPolicy};
use shared::jwt::{JwtError, JwtKeys};
use shared::phone::PhoneNormalizer;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, security_headers_middleware, trace_id, SecurityHeaders,
};
use crate::routes::{guests, health, invitations, me, wishes};
use crate::services::LocalImageStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtKeys>,
    pub normalizer: PhoneNormalizer,
    pub origin_policy: OriginPolicy,
    pub images: Arc<LocalImageStore>,
}

impl AppState {
    /// Builds the shared state. Token verification uses the provider's
    /// public key when configured and falls back to the shared secret.
    pub fn new(config: Config, pool: PgPool) -> Result<Self, JwtError> {
        let jwt = if config.jwt.public_key.is_empty() {
            JwtKeys::from_secret(&config.jwt.secret, config.jwt.leeway_secs)?
        } else {
            JwtKeys::from_rsa_public_key(&config.jwt.public_key, config.jwt.leeway_secs)?
        };

        Ok(Self {
            pool,
            normalizer: config.phone.normalizer(),
            origin_policy: OriginPolicy::new(
                config.bridge.self_origin.clone(),
                config.bridge.trusted_origins.iter().cloned(),
            ),
            images: Arc::new(LocalImageStore::from_config(&config.storage)),
            jwt: Arc::new(jwt),
            config: Arc::new(config),
        })
    }

    pub fn host_options(&self) -> HostOptions {
        HostOptions {
            auto_approve: self.config.wishes.auto_approve,
            max_image_bytes: self.config.wishes.max_image_bytes,
        }
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    let state = AppState::new(config, pool)?;
    let config = state.config.clone();

    let security = Arc::new(SecurityHeaders::new(
        state.origin_policy.trusted(),
        config.security.hsts_enabled,
    ));

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Authenticated through the UserAuth extractor in each handler
    let user_routes = Router::new()
        .route("/api/v1/invitations", post(invitations::create_invitation))
        .route("/api/v1/invitations/:id", get(invitations::get_invitation))
        .route(
            "/api/v1/invitations/:id/guests",
            post(guests::add_guest).get(guests::list_guests),
        )
        .route(
            "/api/v1/invitations/:id/guests/:guest_id",
            delete(guests::remove_guest),
        )
        .route("/api/v1/me/invitations/link", post(me::link_invitations))
        .route("/api/v1/me/invitations", get(me::list_linked_invitations));

    // Origin-checked instead of authenticated
    let bridge_routes = Router::new().route(
        "/api/v1/invitations/:id/wishes/messages",
        post(wishes::handle_message),
    );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let mut router = Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(bridge_routes);

    // Uploaded images are served from disk unless a CDN base URL is configured
    let image_path = config.storage.public_base_url.trim_end_matches('/');
    if image_path.starts_with('/') {
        router = router.nest_service(image_path, ServeDir::new(&config.storage.image_dir));
    }

    Ok(router
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            security,
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state))
}
