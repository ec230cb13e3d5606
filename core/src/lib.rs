pub mod analyzer;
pub mod config;
pub mod engine;
pub mod error;
pub mod intake;
pub mod logger;
pub mod output;
pub mod session;
pub mod tone;

// Re-exports for convenience
pub use analyzer::Analyzer;
pub use config::Config;
pub use engine::{AnalysisEngine, AnalysisReport, EngineClient};
pub use error::{Result, TextLensError};
pub use session::AnalysisStatus;
pub use tone::Tone;
