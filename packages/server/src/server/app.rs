//! Application setup and router composition.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domains::auth::JwtService;
use crate::domains::{auth, commons, menu, reviews, users};
use crate::server::middleware::{extract_client_ip, jwt_auth_middleware};
use crate::server::routes::health_handler;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: Arc<JwtService>,
    /// Emails promoted to ADMIN on login.
    pub admin_emails: Arc<Vec<String>>,
}

/// Build the Axum application router.
///
/// All business routes live under `/api` behind the rate limiter; the
/// health check is mounted outside it so probes are never throttled.
pub fn build_app(
    pool: PgPool,
    jwt_secret: &str,
    jwt_issuer: String,
    admin_emails: Vec<String>,
    allowed_origins: Vec<String>,
) -> Router {
    let jwt_service = Arc::new(JwtService::new(jwt_secret, jwt_issuer));

    let app_state = AppState {
        db_pool: pool,
        jwt_service: jwt_service.clone(),
        admin_emails: Arc::new(admin_emails),
    };

    // CORS configuration - explicit allow-list, or any origin for development
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        )
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Rate limiting configuration
    // API: 10 requests per second per IP with bursts up to 20
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10) // Base rate: 10 requests per second
            .burst_size(20) // Allow bursts up to 20
            .use_headers() // Extract IP from X-Forwarded-For header
            .finish()
            .expect("Rate limiter configuration is valid and should never fail"),
    );
    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    let api = Router::new()
        // Auth
        .route("/auth/login", post(auth::routes::login_handler))
        .route("/currentUser", get(auth::routes::current_user_handler))
        // Alias proposals
        .route(
            "/currentUser/proposeAlias",
            post(users::routes::propose_alias_handler),
        )
        .route(
            "/currentUser/aliasHistory",
            get(users::routes::alias_history_handler),
        )
        // Dining commons
        .route("/diningcommons/all", get(commons::routes::list_handler))
        .route(
            "/diningcommons",
            get(commons::routes::get_handler)
                .post(commons::routes::create_handler)
                .put(commons::routes::update_handler)
                .delete(commons::routes::delete_handler),
        )
        // Menu items
        .route("/menuitems/all", get(menu::routes::list_handler))
        .route(
            "/menuitems",
            get(menu::routes::get_handler)
                .post(menu::routes::create_handler)
                .put(menu::routes::update_handler)
                .delete(menu::routes::delete_handler),
        )
        // Reviews
        .route(
            "/reviews",
            post(reviews::routes::create_handler)
                .put(reviews::routes::update_handler)
                .delete(reviews::routes::delete_handler),
        )
        .route("/reviews/forItem", get(reviews::routes::for_item_handler))
        .route("/reviews/mine", get(reviews::routes::mine_handler))
        .route("/reviews/all", get(reviews::routes::all_handler))
        .route(
            "/reviews/needsModeration",
            get(reviews::routes::needs_moderation_handler),
        )
        .route("/reviews/moderate", put(reviews::routes::moderate_handler))
        // Admin: alias moderation queue + decision
        .route(
            "/admin/usersWithProposedAlias",
            get(users::routes::alias_queue_handler),
        )
        .route(
            "/admin/updateAliasModeration",
            put(users::routes::update_alias_moderation_handler),
        )
        // Admin: user management
        .route("/admin/users", get(users::routes::list_users_handler))
        .route(
            "/admin/users/toggleModerator",
            post(users::routes::toggle_moderator_handler),
        )
        .route(
            "/admin/users/toggleAdmin",
            post(users::routes::toggle_admin_handler),
        )
        .layer(rate_limit_layer);

    // Clone jwt_service for middleware closure
    let jwt_service_for_middleware = jwt_service.clone();

    Router::new()
        .nest("/api", api)
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        })) // JWT authentication
        .layer(middleware::from_fn(extract_client_ip))
        .layer(Extension(app_state)) // Add shared state (must be after middlewares that need it)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
