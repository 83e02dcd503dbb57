use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};

use crate::middleware::auth::authenticate;
use crate::middleware::role::require_admin;
use crate::modules::users::controller::{
    create_user, delete_user, get_profile, get_user, get_users, login, update_user,
};
use crate::state::AppState;

pub fn init_users_router(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state, authenticate));

    Router::new()
        .route("/login", post(login))
        .route("/profile", get(get_profile))
        .merge(admin_routes)
}
