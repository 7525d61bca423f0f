// src/remote/mod.rs

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::{ResultPayload, SubmissionRequest};

pub mod http;

pub use http::HttpSolveClient;

/// The external service that turns a submission into a generated solution.
///
/// Implementations perform exactly one exchange per call. Any error they return
/// (transport, non-success status, undecodable body) is folded by the lifecycle
/// controller into a failure payload, so implementations should not retry.
#[async_trait]
pub trait SolveBoundary: Send + Sync {
    async fn solve(&self, request: &SubmissionRequest) -> Result<ResultPayload>;
}
