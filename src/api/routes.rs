// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health_check))
            .route("/languages", web::get().to(handlers::get_languages))
            .route("/solve", web::post().to(handlers::submit_solve))
            .route("/state", web::get().to(handlers::get_state))
            .route("/view", web::get().to(handlers::get_view))
            .route("/copy", web::post().to(handlers::copy_response))
            .route("/blocks/{index}/copy", web::post().to(handlers::copy_block))
            .route("/clipboard", web::get().to(handlers::get_clipboard))
            .route("/ws", web::get().to(handlers::ws_handler))
    );
}
