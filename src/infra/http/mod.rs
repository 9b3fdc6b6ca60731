//! HTTP surface: routers, handlers, middleware.

mod health;
mod images;
mod menu;
pub mod middleware;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::application::menu::MenuService;
use crate::application::repos::ImageStore;
use crate::infra::db::PostgresRepositories;

#[derive(Clone)]
pub struct AppState {
    pub menu: Arc<MenuService>,
    pub images: Arc<dyn ImageStore>,
    pub db: Arc<PostgresRepositories>,
}

pub fn build_router(state: AppState, upload_body_limit: usize) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route(
            "/api/menu",
            get(menu::list_menu_items).post(menu::create_menu_item),
        )
        .route("/api/menu/categories", get(menu::list_categories))
        .route(
            "/api/menu/{id}",
            get(menu::get_menu_item)
                .put(menu::update_menu_item)
                .delete(menu::delete_menu_item),
        )
        .route(
            "/api/images",
            post(images::upload_image).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/api/images/{*key}", get(images::get_image))
        .layer(axum::middleware::from_fn(middleware::log_responses))
        .layer(axum::middleware::from_fn(middleware::set_request_context))
        .with_state(state)
}
