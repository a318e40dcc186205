//! # Sales Agent
//!
//! A goal-driven orchestrator for sales reporting. Callers submit a
//! free-text goal ("Generate Q3 2024 sales report"); the orchestrator
//! breaks it into subtasks with a language model, routes each subtask to
//! the HTTP endpoint registered for its task type, and returns the
//! per-task outcomes.
//!
//! ## Goal Flow
//! 1. Extract quarter/year parameters from the goal text
//! 2. Decompose the goal into subtasks via the completion service
//! 3. Inject a mandatory data-fetch subtask and stamp the parameters
//! 4. Dispatch each subtask to its task endpoint, collecting outcomes
//!
//! ## Modules
//! - `config`: environment-derived configuration
//! - `llm`: completion-service client abstraction
//! - `orchestrator`: the goal-to-subtask pipeline
//! - `api`: HTTP surface (goal entry point + task stage endpoints)

pub mod api;
pub mod config;
pub mod llm;
pub mod orchestrator;

pub use config::Config;
