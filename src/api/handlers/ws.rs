// src/api/handlers/ws.rs
use actix::{Actor, StreamHandler, Handler, Message, Addr, AsyncContext};
use actix_web::{web, HttpRequest, HttpResponse, Error};
use actix_web_actors::ws;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::lifecycle::{Controller, LifecycleSnapshot, Ticket};

/// Pushed to every connected client when the lifecycle state changes.
#[derive(Message, Clone, Serialize)]
#[rtype(result = "()")]
pub struct LifecycleUpdate {
    pub ticket: Ticket,
    pub status: String,
    pub loading: bool,
    pub success: Option<bool>,
    pub message: Option<String>,
    pub at: String,
}

impl LifecycleUpdate {
    pub fn from_snapshot(snapshot: &LifecycleSnapshot) -> Self {
        let payload = snapshot.state.payload();
        Self {
            ticket: snapshot.ticket,
            status: snapshot.state.name().to_string(),
            loading: snapshot.state.is_loading(),
            success: payload.map(|p| p.success),
            message: payload.and_then(|p| p.message.clone()),
            at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Clone, Default)]
pub struct WsBroker {
    clients: Arc<RwLock<Vec<Addr<WsConnection>>>>,
}

impl WsBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, addr: Addr<WsConnection>) {
        let mut clients = self.clients.write().await;
        clients.push(addr);
    }

    pub async fn unregister(&self, addr: &Addr<WsConnection>) {
        let mut clients = self.clients.write().await;
        clients.retain(|c| c != addr);
    }

    pub async fn broadcast(&self, msg: LifecycleUpdate) {
        let clients = self.clients.read().await;
        for client in clients.iter() {
            client.do_send(msg.clone());
        }
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }
}

/// Forwards every published lifecycle snapshot to the broker until the
/// controller goes away. The task yields how many updates it forwarded.
pub fn spawn_lifecycle_bridge(controller: &Controller, broker: WsBroker) -> JoinHandle<usize> {
    let mut updates = controller.subscribe();
    actix_web::rt::spawn(async move {
        let mut forwarded = 0;
        while updates.changed().await.is_ok() {
            let update = LifecycleUpdate::from_snapshot(&updates.borrow_and_update());
            log::debug!("Broadcasting lifecycle update: #{} {}", update.ticket, update.status);
            broker.broadcast(update).await;
            forwarded += 1;
        }
        forwarded
    })
}

pub struct WsConnection {
    broker: WsBroker,
}

impl WsConnection {
    pub fn new(broker: WsBroker) -> Self {
        Self { broker }
    }
}

impl Actor for WsConnection {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let addr = ctx.address();
        let broker = self.broker.clone();
        actix::spawn(async move {
            broker.register(addr).await;
        });
    }

    fn stopped(&mut self, ctx: &mut Self::Context) {
        let addr = ctx.address();
        let broker = self.broker.clone();
        actix::spawn(async move {
            broker.unregister(&addr).await;
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsConnection {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(reason)) => ctx.close(reason),
            _ => (),
        }
    }
}

impl Handler<LifecycleUpdate> for WsConnection {
    type Result = ();

    fn handle(&mut self, msg: LifecycleUpdate, ctx: &mut Self::Context) {
        if let Ok(json) = serde_json::to_string(&msg) {
            ctx.text(json);
        }
    }
}

pub async fn ws_handler(
    req: HttpRequest,
    stream: web::Payload,
    broker: web::Data<WsBroker>,
) -> Result<HttpResponse, Error> {
    let conn = WsConnection::new(broker.get_ref().clone());
    ws::start(conn, &req, stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolutionPolicy;
    use crate::errors::Result;
    use crate::lifecycle::{LifecycleState, FAILURE_MESSAGE};
    use crate::models::{Difficulty, Language, ResultPayload, SubmissionRequest};
    use crate::remote::SolveBoundary;
    use async_trait::async_trait;

    struct Offline;

    #[async_trait]
    impl SolveBoundary for Offline {
        async fn solve(&self, _request: &SubmissionRequest) -> Result<ResultPayload> {
            Err(crate::errors::SolverError::Config("offline".to_string()))
        }
    }

    fn request() -> SubmissionRequest {
        SubmissionRequest::new("Two Sum", Difficulty::Easy, Language::Rust, "p").unwrap()
    }

    #[test]
    fn test_update_from_pending_snapshot() {
        let snapshot = LifecycleSnapshot { state: LifecycleState::Pending, ticket: 3 };
        let update = LifecycleUpdate::from_snapshot(&snapshot);
        assert_eq!(update.ticket, 3);
        assert_eq!(update.status, "pending");
        assert!(update.loading);
        assert_eq!(update.success, None);
        assert_eq!(update.message, None);
        assert!(chrono::DateTime::parse_from_rfc3339(&update.at).is_ok());
    }

    #[test]
    fn test_update_from_resolved_snapshot() {
        let payload = crate::lifecycle::failure_payload(&request());
        let snapshot = LifecycleSnapshot { state: LifecycleState::Resolved(payload), ticket: 1 };
        let update = LifecycleUpdate::from_snapshot(&snapshot);
        assert_eq!(update.status, "resolved");
        assert!(!update.loading);
        assert_eq!(update.success, Some(false));
        assert_eq!(update.message.as_deref(), Some(FAILURE_MESSAGE));
    }

    #[actix_web::test]
    async fn test_bridge_forwards_until_controller_drops() {
        let broker = WsBroker::new();
        let controller = Controller::new(std::sync::Arc::new(Offline), ResolutionPolicy::LastSubmit);
        let bridge = spawn_lifecycle_bridge(&controller, broker.clone());

        controller.submit(request()).await;
        tokio::task::yield_now().await;
        drop(controller);

        // Pending and resolved may coalesce in the watch channel.
        let forwarded = bridge.await.unwrap();
        assert!((1..=2).contains(&forwarded));
        assert_eq!(broker.client_count().await, 0);
    }
}
