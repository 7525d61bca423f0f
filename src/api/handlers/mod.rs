// src/api/handlers/mod.rs
mod health;
mod solve;
mod view;
pub mod ws;

pub use health::{health_check, get_languages};
pub use solve::{submit_solve, get_state};
pub use view::{get_view, copy_response, copy_block, get_clipboard};
pub use ws::{ws_handler, spawn_lifecycle_bridge, WsBroker};
