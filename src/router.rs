use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};

use crate::{
    AppState,
    middleware::{log_errors, route_guard},
    navigation::SHELL_ROUTES,
    routes,
};

/// Public auth endpoints, plus every shell page behind the route guard.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/me", get(routes::auth::me))
        .route("/navigation", get(routes::navigation::navigation));

    let mut shell_routes = Router::new()
        .route(
            "/users",
            get(routes::user::list_users).post(routes::user::create_user),
        )
        .route(
            "/users/{id}",
            put(routes::user::update_user).delete(routes::user::delete_user),
        );
    for route in SHELL_ROUTES.iter().filter(|r| r.path != "/users") {
        shell_routes = shell_routes.route(route.path, get(routes::shell::shell_page));
    }
    let shell_routes = shell_routes.route_layer(from_fn_with_state(state.clone(), route_guard));

    Router::new()
        .merge(public_routes)
        .merge(shell_routes)
        .layer(from_fn(log_errors))
        .with_state(state)
}
