// src/lifecycle/mod.rs
pub mod controller;
pub mod state;

pub use controller::Controller;
pub use state::{failure_payload, LifecycleEvent, LifecycleSnapshot, LifecycleState, Ticket, FAILURE_MESSAGE};
