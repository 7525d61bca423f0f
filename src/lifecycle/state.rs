// src/lifecycle/state.rs
use serde::Serialize;

use crate::config::ResolutionPolicy;
use crate::models::{ResultPayload, SubmissionRequest};

/// Shown whenever the solve endpoint could not produce a usable payload.
pub const FAILURE_MESSAGE: &str = "Failed to connect to the server. Please try again.";

/// Sequence number handed out per submission. Zero means nothing was submitted yet.
pub type Ticket = u64;

/// What the result panel is showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "payload", rename_all = "lowercase")]
pub enum LifecycleState {
    Idle,
    Pending,
    Resolved(ResultPayload),
}

impl LifecycleState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LifecycleState::Pending)
    }

    /// The visible payload. Always `None` while loading.
    pub fn payload(&self) -> Option<&ResultPayload> {
        match self {
            LifecycleState::Resolved(payload) => Some(payload),
            LifecycleState::Idle | LifecycleState::Pending => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Pending => "pending",
            LifecycleState::Resolved(_) => "resolved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Submitted,
    Resolved { ticket: Ticket, payload: ResultPayload },
}

/// The lifecycle state plus the most recently issued ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleSnapshot {
    pub state: LifecycleState,
    pub ticket: Ticket,
}

impl Default for LifecycleSnapshot {
    fn default() -> Self {
        Self { state: LifecycleState::Idle, ticket: 0 }
    }
}

impl LifecycleSnapshot {
    /// Applies `event`, returning the next snapshot or `None` when the event is
    /// dropped as stale under `policy`.
    pub fn apply(&self, event: LifecycleEvent, policy: ResolutionPolicy) -> Option<Self> {
        match event {
            LifecycleEvent::Submitted => Some(Self {
                state: LifecycleState::Pending,
                ticket: self.ticket + 1,
            }),
            LifecycleEvent::Resolved { ticket, payload } => {
                if policy == ResolutionPolicy::LastSubmit && ticket != self.ticket {
                    return None;
                }
                Some(Self {
                    state: LifecycleState::Resolved(payload),
                    ticket: self.ticket,
                })
            }
        }
    }
}

/// The payload reported when the remote call fails, echoing the request's labels.
pub fn failure_payload(request: &SubmissionRequest) -> ResultPayload {
    ResultPayload {
        success: false,
        response: None,
        message: Some(FAILURE_MESSAGE.to_string()),
        title: Some(request.title().to_string()),
        language: Some(request.language().to_string()),
        difficulty: Some(request.difficulty().to_string()),
    }
}
