// Core modules
pub mod data;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod models;
pub mod scoring;
pub mod synthetic;

// Re-export commonly used types
pub use engine::{AnalysisRequest, EngineConfig, SignalEngine};
pub use error::EngineError;
pub use models::*;

// Error handling
pub type Result<T> = std::result::Result<T, EngineError>;
