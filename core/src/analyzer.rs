//! Intake-and-analysis orchestration
//!
//! [`Analyzer`] composes the intake state, the analysis session and an
//! [`AnalysisEngine`] collaborator. Presentation layers (the CLI here, a
//! UI elsewhere) mutate intake through it, trigger `analyze`/`reset`, and
//! read back snapshots of the session state.

use crate::engine::{AnalysisEngine, AnalysisReport};
use crate::error::{Result, TextLensError};
use crate::intake::{InputMode, IntakeState, UploadedFile};
use crate::session::{AnalysisSession, AnalysisStatus};
use crate::tone::Tone;
use std::sync::Arc;
use tokio::time::{timeout, Duration};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Uploaded-file metadata exposed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFileInfo {
    pub name: String,
    pub size_bytes: u64,
}

pub struct Analyzer {
    intake: IntakeState,
    session: AnalysisSession,
    engine: Arc<dyn AnalysisEngine>,
    request_timeout: Duration,
}

impl Analyzer {
    pub fn new(engine: Arc<dyn AnalysisEngine>) -> Self {
        Self {
            intake: IntakeState::new(),
            session: AnalysisSession::new(),
            engine,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    // -------------------------------------------------------------------
    // Intake passthroughs
    // -------------------------------------------------------------------

    pub fn set_typed_text(&mut self, value: impl Into<String>) {
        self.intake.set_typed_text(value);
    }

    pub fn submit_file(&mut self, file: UploadedFile) -> Result<()> {
        self.intake.submit_file(file)
    }

    pub fn accept_drop(&mut self, files: Vec<UploadedFile>) -> Result<()> {
        self.intake.accept_drop(files)
    }

    pub fn remove_file(&mut self) {
        self.intake.remove_file();
    }

    // -------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------

    /// Run one analysis request against the engine.
    ///
    /// Refused with `EmptyContent` before any state change when nothing
    /// is eligible for analysis. Otherwise the session enters Loading
    /// immediately; decode failures, engine failures and timeouts all
    /// land in Failed with a stored message. Returns the request's
    /// sequence number.
    ///
    /// Takes `&self` deliberately: two interleaved calls are legal and
    /// serialized by the session's last-call-wins rule.
    pub async fn analyze(&self, tone: Option<Tone>) -> Result<u64> {
        // Pre-flight gate: no Loading transition, no engine call
        if !self.intake.has_content() {
            return Err(TextLensError::EmptyContent);
        }

        let seq = self.session.begin();

        let content = match self.intake.resolve_content().await {
            Ok(content) => content,
            Err(err) => {
                self.session.complete(seq, Err(err));
                return Ok(seq);
            }
        };

        let outcome = match timeout(self.request_timeout, self.engine.analyze(&content, tone)).await
        {
            Ok(result) => result,
            Err(_) => Err(TextLensError::Timeout {
                duration: self.request_timeout,
            }),
        };

        self.session.complete(seq, outcome);
        Ok(seq)
    }

    /// Joint reset: session back to Idle, intake back to empty text mode
    pub fn reset(&mut self) {
        self.session.reset();
        self.intake.clear();
    }

    // -------------------------------------------------------------------
    // Snapshots for the presentation layer
    // -------------------------------------------------------------------

    pub fn input_mode(&self) -> InputMode {
        self.intake.mode()
    }

    pub fn typed_text(&self) -> &str {
        self.intake.typed_text()
    }

    pub fn uploaded_file_info(&self) -> Option<UploadedFileInfo> {
        self.intake.uploaded_file().map(|f| UploadedFileInfo {
            name: f.name.clone(),
            size_bytes: f.size_bytes,
        })
    }

    pub fn status(&self) -> AnalysisStatus {
        self.session.status()
    }

    pub fn report(&self) -> Option<AnalysisReport> {
        self.session.report()
    }

    pub fn error_message(&self) -> Option<String> {
        self.session.error_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    /// Scripted engine: per-call delays, recorded arguments, optional
    /// forced failure.
    struct MockEngine {
        calls: AtomicUsize,
        delays: Vec<Duration>,
        fail_with: Option<String>,
        fail_first_only: bool,
        seen: Mutex<Vec<(String, Option<Tone>)>>,
    }

    impl MockEngine {
        fn instant() -> Self {
            Self::with_delays(vec![])
        }

        fn with_delays(delays: Vec<Duration>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delays,
                fail_with: None,
                fail_first_only: false,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::instant()
            }
        }

        fn failing_once(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                fail_first_only: true,
                ..Self::instant()
            }
        }
    }

    #[async_trait]
    impl AnalysisEngine for MockEngine {
        async fn analyze(&self, content: &str, tone: Option<Tone>) -> Result<AnalysisReport> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().push((content.to_string(), tone));

            if let Some(delay) = self.delays.get(call) {
                sleep(*delay).await;
            }

            if let Some(message) = &self.fail_with {
                if !self.fail_first_only || call == 0 {
                    return Err(TextLensError::AnalysisFailure {
                        message: message.clone(),
                    });
                }
            }

            Ok(AnalysisReport {
                moral: format!("call-{}: {}", call, content),
                keywords: vec!["mock".to_string()],
                ..Default::default()
            })
        }
    }

    fn analyzer_with(engine: MockEngine) -> (Analyzer, Arc<MockEngine>) {
        let engine = Arc::new(engine);
        (Analyzer::new(engine.clone()), engine)
    }

    #[tokio::test]
    async fn test_analyze_refused_on_empty_content() {
        let (analyzer, engine) = analyzer_with(MockEngine::instant());

        let err = analyzer.analyze(None).await.unwrap_err();
        assert!(matches!(err, TextLensError::EmptyContent));
        assert_eq!(analyzer.status(), AnalysisStatus::Idle);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_whitespace_only_text_is_refused() {
        let (mut analyzer, engine) = analyzer_with(MockEngine::instant());
        analyzer.set_typed_text("  \n ");

        assert!(analyzer.analyze(None).await.is_err());
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_typed_text_success_scenario() {
        let (mut analyzer, engine) = analyzer_with(MockEngine::instant());
        analyzer.set_typed_text("Hello world");

        analyzer.analyze(None).await.unwrap();

        assert_eq!(analyzer.status(), AnalysisStatus::Succeeded);
        let report = analyzer.report().unwrap();
        assert!(report.moral.contains("Hello world"));
        assert!(analyzer.error_message().is_none());

        // Engine was called exactly once with (content, tone) unchanged
        let seen = engine.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], ("Hello world".to_string(), None));
    }

    #[tokio::test]
    async fn test_tone_passed_through_unmodified() {
        let (mut analyzer, engine) = analyzer_with(MockEngine::instant());
        analyzer.set_typed_text("text");

        analyzer.analyze(Some(Tone::Academic)).await.unwrap();

        assert_eq!(engine.seen.lock()[0].1, Some(Tone::Academic));
    }

    #[tokio::test]
    async fn test_engine_failure_lands_in_failed() {
        let (mut analyzer, _engine) = analyzer_with(MockEngine::failing("model exploded"));
        analyzer.set_typed_text("text");

        analyzer.analyze(None).await.unwrap();

        assert_eq!(analyzer.status(), AnalysisStatus::Failed);
        assert!(analyzer.report().is_none());
        assert!(analyzer.error_message().unwrap().contains("model exploded"));
    }

    #[tokio::test]
    async fn test_retry_after_failure_without_reset() {
        let (mut analyzer, _) = analyzer_with(MockEngine::failing_once("transient"));
        analyzer.set_typed_text("text");

        analyzer.analyze(None).await.unwrap();
        assert_eq!(analyzer.status(), AnalysisStatus::Failed);

        // A fresh analyze recovers without an intervening reset
        analyzer.analyze(None).await.unwrap();
        assert_eq!(analyzer.status(), AnalysisStatus::Succeeded);
        assert!(analyzer.error_message().is_none());
    }

    #[tokio::test]
    async fn test_decode_failure_lands_in_failed() {
        let (mut analyzer, engine) = analyzer_with(MockEngine::instant());
        analyzer
            .submit_file(UploadedFile::new(
                "doc.pdf",
                "application/pdf",
                vec![0xff, 0xfe, 0x00],
            ))
            .unwrap();

        analyzer.analyze(None).await.unwrap();

        assert_eq!(analyzer.status(), AnalysisStatus::Failed);
        assert!(analyzer.error_message().is_some());
        // Engine never invoked when decoding fails
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_file_content_reaches_engine() {
        let (mut analyzer, engine) = analyzer_with(MockEngine::instant());
        analyzer
            .submit_file(UploadedFile::new(
                "story.txt",
                "text/plain",
                b"file body".to_vec(),
            ))
            .unwrap();

        analyzer.analyze(None).await.unwrap();

        assert_eq!(engine.seen.lock()[0].0, "file body");
        assert_eq!(
            analyzer.uploaded_file_info(),
            Some(UploadedFileInfo {
                name: "story.txt".to_string(),
                size_bytes: 9,
            })
        );
    }

    #[tokio::test]
    async fn test_last_call_wins_with_interleaved_requests() {
        let (mut analyzer, _engine) = analyzer_with(MockEngine::with_delays(vec![
            Duration::from_millis(80),
            Duration::from_millis(5),
        ]));
        analyzer.set_typed_text("race");

        // First call is slow, second is fast: the second call's response
        // arrives first, the first call's arrives later and is discarded.
        let (r1, r2) = tokio::join!(analyzer.analyze(None), analyzer.analyze(None));
        r1.unwrap();
        r2.unwrap();

        assert_eq!(analyzer.status(), AnalysisStatus::Succeeded);
        // call index 1 is the second (latest-issued) request
        assert!(analyzer.report().unwrap().moral.starts_with("call-1:"));
    }

    #[tokio::test]
    async fn test_timeout_lands_in_failed() {
        let engine = Arc::new(MockEngine::with_delays(vec![Duration::from_millis(200)]));
        let mut analyzer =
            Analyzer::new(engine).with_request_timeout(Duration::from_millis(20));
        analyzer.set_typed_text("slow");

        analyzer.analyze(None).await.unwrap();

        assert_eq!(analyzer.status(), AnalysisStatus::Failed);
        assert!(analyzer.error_message().unwrap().contains("too long"));
    }

    #[tokio::test]
    async fn test_reset_clears_both_components() {
        let (mut analyzer, _) = analyzer_with(MockEngine::instant());
        analyzer
            .submit_file(UploadedFile::new("f.txt", "text/plain", b"x".to_vec()))
            .unwrap();
        analyzer.analyze(Some(Tone::Casual)).await.unwrap();
        assert_eq!(analyzer.status(), AnalysisStatus::Succeeded);

        analyzer.reset();

        assert_eq!(analyzer.status(), AnalysisStatus::Idle);
        assert!(analyzer.report().is_none());
        assert!(analyzer.error_message().is_none());
        assert_eq!(analyzer.input_mode(), InputMode::Text);
        assert_eq!(analyzer.typed_text(), "");
        assert!(analyzer.uploaded_file_info().is_none());
    }
}
