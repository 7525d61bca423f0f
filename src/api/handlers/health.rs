// src/api/handlers/health.rs
use actix_web::{HttpResponse, Result};
use serde_json::json;

use crate::models::{Difficulty, Language};

pub async fn health_check() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "dsa-solver",
        "version": env!("CARGO_PKG_VERSION")
    })))
}

/// GET /api/v1/languages - The catalog the submission form offers
pub async fn get_languages() -> Result<HttpResponse> {
    let languages: Vec<&str> = Language::CATALOG.iter().map(|l| l.as_str()).collect();
    let difficulties: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();
    Ok(HttpResponse::Ok().json(json!({
        "languages": languages,
        "difficulties": difficulties,
    })))
}
