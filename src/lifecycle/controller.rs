// src/lifecycle/controller.rs
use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ResolutionPolicy;
use crate::lifecycle::state::{failure_payload, LifecycleEvent, LifecycleSnapshot, LifecycleState, Ticket};
use crate::models::{ResultPayload, SubmissionRequest};
use crate::remote::SolveBoundary;

/// Owns the submission state machine and drives the remote call.
///
/// State lives in a `watch` channel: transitions from overlapping submissions
/// are serialized by the channel lock, and any number of observers can follow
/// along with [`Controller::subscribe`].
pub struct Controller {
    boundary: Arc<dyn SolveBoundary>,
    policy: ResolutionPolicy,
    state: watch::Sender<LifecycleSnapshot>,
}

impl Controller {
    pub fn new(boundary: Arc<dyn SolveBoundary>, policy: ResolutionPolicy) -> Self {
        let (state, _) = watch::channel(LifecycleSnapshot::default());
        Self { boundary, policy, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> LifecycleSnapshot {
        self.state.borrow().clone()
    }

    pub fn state(&self) -> LifecycleState {
        self.state.borrow().state.clone()
    }

    /// Moves to `Pending` right away and returns a future that performs the
    /// single remote call and resolves the state.
    ///
    /// The transition happens when this is called, not when the future is
    /// first polled, so the previous payload is never visible next to the
    /// loading indicator.
    pub fn submit(&self, request: SubmissionRequest) -> impl Future<Output = Ticket> + Send + '_ {
        let ticket = self.begin(&request);
        async move {
            self.complete(ticket, request).await;
            ticket
        }
    }

    /// Like [`Controller::submit`], with the remote call on a spawned task.
    /// Returns the issued ticket alongside the task handle.
    pub fn spawn_submit(self: &Arc<Self>, request: SubmissionRequest) -> (Ticket, JoinHandle<Ticket>) {
        let ticket = self.begin(&request);
        (ticket, self.spawn_complete(ticket, request))
    }

    /// Starts a submission only if none is pending. The check and the move to
    /// `Pending` happen under one channel lock, so concurrent callers cannot
    /// both get through.
    pub fn try_spawn_submit(
        self: &Arc<Self>,
        request: SubmissionRequest,
    ) -> Option<(Ticket, JoinHandle<Ticket>)> {
        let ticket = self.try_begin(&request)?;
        Some((ticket, self.spawn_complete(ticket, request)))
    }

    fn spawn_complete(self: &Arc<Self>, ticket: Ticket, request: SubmissionRequest) -> JoinHandle<Ticket> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            controller.complete(ticket, request).await;
            ticket
        })
    }

    fn begin(&self, request: &SubmissionRequest) -> Ticket {
        let mut issued = 0;
        self.state.send_modify(|snapshot| {
            if let Some(next) = snapshot.apply(LifecycleEvent::Submitted, self.policy) {
                issued = next.ticket;
                *snapshot = next;
            }
        });
        log_started(issued, request);
        issued
    }

    fn try_begin(&self, request: &SubmissionRequest) -> Option<Ticket> {
        let mut issued = None;
        self.state.send_if_modified(|snapshot| {
            if snapshot.state.is_loading() {
                return false;
            }
            match snapshot.apply(LifecycleEvent::Submitted, self.policy) {
                Some(next) => {
                    issued = Some(next.ticket);
                    *snapshot = next;
                    true
                }
                None => false,
            }
        });

        match issued {
            Some(ticket) => log_started(ticket, request),
            None => log::info!("⏸️  Submission '{}' rejected: one is already pending", request.title()),
        }
        issued
    }

    async fn complete(&self, ticket: Ticket, request: SubmissionRequest) {
        let payload = match self.boundary.solve(&request).await {
            Ok(payload) => {
                log::info!("✅ Submission #{} resolved (success={})", ticket, payload.success);
                payload
            }
            Err(e) => {
                log::warn!("❌ Submission #{} failed: {}", ticket, e);
                failure_payload(&request)
            }
        };

        if !self.resolve(ticket, payload) {
            log::info!("⏭️  Discarding stale resolution for submission #{}", ticket);
        }
    }

    fn resolve(&self, ticket: Ticket, payload: ResultPayload) -> bool {
        let event = LifecycleEvent::Resolved { ticket, payload };
        self.state.send_if_modified(|snapshot| match snapshot.apply(event, self.policy) {
            Some(next) => {
                *snapshot = next;
                true
            }
            None => false,
        })
    }
}

fn log_started(ticket: Ticket, request: &SubmissionRequest) {
    log::info!(
        "🎯 Submission #{} started: '{}' ({}, {})",
        ticket,
        request.title(),
        request.language(),
        request.difficulty()
    );
}
