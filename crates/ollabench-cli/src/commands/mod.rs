//! CLI command handlers

pub mod baseline;
pub mod health;
pub mod models;
pub mod round;
pub mod run;
