// src/api/handlers/solve.rs
use actix_web::{web, HttpResponse, Result};
use serde::Serialize;
use serde_json::json;

use crate::api::AppState;
use crate::lifecycle::{LifecycleState, Ticket};
use crate::models::{SubmissionForm, SubmissionRequest};

#[derive(Serialize)]
pub struct SubmitResponse {
    pub ticket: Ticket,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct StateResponse {
    pub ticket: Ticket,
    pub loading: bool,
    pub state: LifecycleState,
}

/// POST /api/v1/solve - Validate the form and start a submission
pub async fn submit_solve(
    state: web::Data<AppState>,
    form: web::Json<SubmissionForm>,
) -> Result<HttpResponse> {
    let request = match SubmissionRequest::try_from(form.into_inner()) {
        Ok(request) => request,
        Err(e) => {
            log::info!("Rejected submission: {}", e);
            return Ok(HttpResponse::BadRequest().json(json!({ "error": e.to_string() })));
        }
    };

    // The form stays disabled while a solution is being generated.
    let Some((ticket, _pending)) = state.session.try_submit(request) else {
        return Ok(HttpResponse::Conflict().json(json!({
            "error": "A submission is already in progress"
        })));
    };

    Ok(HttpResponse::Accepted().json(SubmitResponse {
        ticket,
        status: "pending",
    }))
}

/// GET /api/v1/state - Current lifecycle state
pub async fn get_state(state: web::Data<AppState>) -> Result<HttpResponse> {
    let snapshot = state.session.controller().snapshot();
    Ok(HttpResponse::Ok().json(StateResponse {
        ticket: snapshot.ticket,
        loading: snapshot.state.is_loading(),
        state: snapshot.state,
    }))
}
