use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    delete_link_handler, delete_topic_handler, health_handler, list_links_handler,
    list_topics_handler, pick_link_handler, post_link_handler, post_topic_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route(
                "/topics",
                post(post_topic_handler)
                    .delete(delete_topic_handler)
                    .get(list_topics_handler),
            )
            .route(
                "/links",
                post(post_link_handler)
                    .get(pick_link_handler)
                    .delete(delete_link_handler),
            )
            .route("/links/list", get(list_links_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
