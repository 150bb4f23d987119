//! ChaCha — phase-scripted emotional-support dialogue core.

pub mod config;
pub mod dialogue;
pub mod emotion;
pub mod error;
pub mod llm;
pub mod routes;
pub mod session;
