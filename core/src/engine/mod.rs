//! Analysis engine interface
//!
//! The orchestration core consumes this trait and never depends on a
//! concrete transport. [`client::EngineClient`] is the production
//! implementation against an OpenAI-compatible endpoint.

pub mod client;

pub use client::{EngineClient, EngineConfig};

use crate::error::Result;
use crate::tone::Tone;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// External analysis collaborator: one call, one structured result,
/// no streaming.
#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    async fn analyze(&self, content: &str, tone: Option<Tone>) -> Result<AnalysisReport>;
}

/// Structured insights returned by the engine.
///
/// Unknown fields on the wire are ignored; missing fields default so a
/// partially-filled response still renders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    /// Core message or summary of the text
    #[serde(default, alias = "summary")]
    pub moral: String,

    /// Key phrases and concepts
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Rewrite in the requested tone; absent when no tone was requested
    #[serde(default, alias = "toneTransformed")]
    pub tone_transformed: Option<String>,

    /// General observations and suggestions
    #[serde(default)]
    pub insights: Vec<String>,
}

impl AnalysisReport {
    /// Whether the engine returned anything renderable at all
    pub fn is_empty(&self) -> bool {
        self.moral.is_empty()
            && self.keywords.is_empty()
            && self.tone_transformed.is_none()
            && self.insights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_deserializes_with_aliases() {
        let raw = r#"{
            "summary": "Perseverance pays off",
            "keywords": ["effort", "patience"],
            "toneTransformed": "One must persevere.",
            "insights": ["Short sentences dominate"],
            "extra_field": 42
        }"#;

        let report: AnalysisReport = serde_json::from_str(raw).unwrap();
        assert_eq!(report.moral, "Perseverance pays off");
        assert_eq!(report.keywords.len(), 2);
        assert_eq!(report.tone_transformed.as_deref(), Some("One must persevere."));
    }

    #[test]
    fn test_report_tolerates_missing_fields() {
        let report: AnalysisReport = serde_json::from_str(r#"{"moral": "m"}"#).unwrap();
        assert_eq!(report.moral, "m");
        assert!(report.keywords.is_empty());
        assert!(report.tone_transformed.is_none());
        assert!(!report.is_empty());
        assert!(AnalysisReport::default().is_empty());
    }
}
