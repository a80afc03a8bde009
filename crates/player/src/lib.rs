//! Tiandao player crate.
//!
//! Keeps a live copy of the player's trial session in sync with the server
//! and gates the actions sent back to it.
//!
//! - `infrastructure`: HTTP and websocket adapters, frame codec, protocol dispatch
//! - `state`: the session snapshot and the roll overlay timer
//! - `application`: login/session orchestration and the action gate
//! - `ui`: console rendering of player events

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod state;
pub mod ui;

pub use config::{ConfigError, PlayerConfig};
