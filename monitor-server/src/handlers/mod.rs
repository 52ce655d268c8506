//! HTTP handlers

pub mod bags;
pub mod health;
pub mod snapshot;
