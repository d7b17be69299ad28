pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod validation;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::middleware::{csrf_middleware, jwt_auth_middleware, CSRF_HEADER};
use crate::state::AppState;

/// Full application router: service endpoints at the root, resources under
/// the configured API prefix.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let api = Router::new()
        .merge(auth_public_routes())
        .merge(protected_routes(state.clone()));

    let router = Router::new()
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health));
    let router = match config.api.route_prefix() {
        Some(prefix) => router.nest(&prefix, api),
        None => router.merge(api),
    };

    let router = router.layer(
        ServiceBuilder::new()
            .layer(cors_layer(&config))
            .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes)),
    );
    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/users", post(auth::signup))
        .route("/users/signin", post(auth::signin))
        .route("/users/token", post(auth::refresh_token))
}

/// Bearer-authenticated routes. `jwt_auth_middleware` is layered last so it
/// runs first and the CSRF guard can read the caller.
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(user_routes())
        .merge(todo_routes())
        .merge(list_routes())
        .route_layer(from_fn_with_state(state.clone(), csrf_middleware))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn user_routes() -> Router<AppState> {
    use handlers::protected::users;

    Router::new()
        .route("/users/me", get(users::whoami))
        .route("/users/:username", delete(users::delete_account))
}

fn todo_routes() -> Router<AppState> {
    use handlers::protected::todos;

    Router::new()
        .route("/todos", post(todos::add_todo).get(todos::get_all_todos))
        .route(
            "/todos/:id",
            get(todos::get_todo).put(todos::update_todo).delete(todos::delete_todo),
        )
        .route("/todos/complete/:id", patch(todos::complete_todo))
        .route("/todos/uncomplete/:id", patch(todos::uncomplete_todo))
        .route("/todos/priority/:id", patch(todos::update_priority))
        .route("/todos/list/:id", patch(todos::update_list))
}

fn list_routes() -> Router<AppState> {
    use handlers::protected::lists;

    Router::new()
        .route("/lists", post(lists::add_list).get(lists::get_all_lists))
        .route(
            "/lists/:id",
            get(lists::get_list).put(lists::update_list).delete(lists::delete_list),
        )
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, HeaderName::from_static(CSRF_HEADER)])
}
