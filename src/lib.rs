// Public API for integration tests and the server binary

pub mod api;
pub mod config;
pub mod feedback;
pub mod llm;
pub mod protocol;
pub mod state;
pub mod types;
pub mod words;
pub mod ws;
