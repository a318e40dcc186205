//! HTTP surface.
//!
//! `routes` wires the goal entry point and the health check; `tasks`
//! hosts the task-stage endpoints the dispatcher targets.

mod routes;
mod tasks;

pub use routes::{serve, AppState};
