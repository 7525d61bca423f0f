// src/lib.rs
pub mod api;
pub mod banner;
pub mod clipboard;
pub mod config;
pub mod copy_state;
pub mod errors;
pub mod lifecycle;
pub mod markdown;
pub mod models;
pub mod presentation;
pub mod remote;
pub mod render;
pub mod viewer;
