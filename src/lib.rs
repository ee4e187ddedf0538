//! Procedure Assistant - voice dialogue controller for experiment procedures.

pub mod assistant;
pub mod config;
pub mod console;
pub mod dialogue;
pub mod display;
pub mod store;
pub mod transport;
