// src/api/handlers/view.rs
use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::api::AppState;
use crate::errors::SolverError;

/// GET /api/v1/view - The result panel as an HTML fragment
pub async fn get_view(state: web::Data<AppState>) -> Result<HttpResponse> {
    let html = state.session.render_html().await;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// POST /api/v1/copy - Copy the whole response
pub async fn copy_response(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(copy_outcome(state.session.copy_response().await))
}

/// POST /api/v1/blocks/{index}/copy - Copy one code block
pub async fn copy_block(
    state: web::Data<AppState>,
    path: web::Path<usize>,
) -> Result<HttpResponse> {
    let index = path.into_inner();
    Ok(copy_outcome(state.session.copy_block(index).await))
}

/// GET /api/v1/clipboard - What the last copy action wrote
pub async fn get_clipboard(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({ "text": state.clipboard.contents() })))
}

fn copy_outcome(outcome: crate::errors::Result<bool>) -> HttpResponse {
    match outcome {
        Ok(acknowledged) => HttpResponse::Ok().json(json!({ "acknowledged": acknowledged })),
        Err(e @ (SolverError::BlockNotFound(_) | SolverError::NothingToCopy)) => {
            HttpResponse::NotFound().json(json!({ "error": e.to_string() }))
        }
        Err(e) => {
            log::error!("Copy failed: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
        }
    }
}
