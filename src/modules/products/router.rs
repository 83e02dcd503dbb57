use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};

use crate::middleware::auth::authenticate;
use crate::middleware::role::require_admin;
use crate::modules::products::controller::{
    create_product, delete_product, get_categories, get_product, get_products, get_stats,
    update_product,
};
use crate::state::AppState;

pub fn init_products_router(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/", post(create_product))
        .route("/{id}", put(update_product).delete(delete_product))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state, authenticate));

    Router::new()
        .route("/", get(get_products))
        .route("/categories", get(get_categories))
        .route("/stats", get(get_stats))
        .route("/{id}", get(get_product))
        .merge(admin_routes)
}
