//! Analysis request lifecycle
//!
//! Drives one in-flight analysis at a time: Idle -> Loading ->
//! Succeeded/Failed, with reset back to Idle from anywhere. A newer
//! request preempts an older one; there is no cancellation primitive, so
//! each request carries a sequence number and a completion is applied
//! only if its sequence is still the latest issued (last-call-wins).

use crate::engine::AnalysisReport;
use crate::error::Result;
use crate::{debug_log, info_log};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Request lifecycle status. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Default)]
struct SessionState {
    status: AnalysisStatus,
    result: Option<AnalysisReport>,
    error_message: Option<String>,
}

/// Analysis session state container.
///
/// `result` and `error_message` are mutually exclusive and both cleared
/// on any new request or reset. All transitions take the inner lock once,
/// so consumers observe each transition atomically.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    state: Mutex<SessionState>,
    next_seq: AtomicU64,
    latest_seq: AtomicU64,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request: transition to Loading, clear any prior
    /// outcome, and return the sequence number the eventual completion
    /// must present. Allowed from any state; an older in-flight request
    /// is implicitly superseded.
    pub fn begin(&self) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest_seq.store(seq, Ordering::SeqCst);

        let mut state = self.state.lock();
        state.status = AnalysisStatus::Loading;
        state.result = None;
        state.error_message = None;

        debug_log!("Analysis request #{} entering Loading", seq);
        seq
    }

    /// Apply the outcome of request `seq`. Returns false (and changes
    /// nothing) when a newer request or a reset has superseded it.
    pub fn complete(&self, seq: u64, outcome: Result<AnalysisReport>) -> bool {
        let mut state = self.state.lock();
        if self.latest_seq.load(Ordering::SeqCst) != seq {
            debug_log!("Discarding stale response for request #{}", seq);
            return false;
        }
        match outcome {
            Ok(report) => {
                info_log!("Analysis request #{} succeeded", seq);
                state.status = AnalysisStatus::Succeeded;
                state.result = Some(report);
                state.error_message = None;
            }
            Err(err) => {
                info_log!("Analysis request #{} failed: {}", seq, err);
                state.status = AnalysisStatus::Failed;
                state.result = None;
                state.error_message = Some(err.user_message());
            }
        }
        true
    }

    /// Return to Idle and clear any outcome. Allowed from any state; an
    /// in-flight request is invalidated so its late completion is
    /// discarded.
    pub fn reset(&self) {
        // Burn a sequence number no request owns
        let fence = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest_seq.store(fence, Ordering::SeqCst);

        let mut state = self.state.lock();
        state.status = AnalysisStatus::Idle;
        state.result = None;
        state.error_message = None;
    }

    pub fn status(&self) -> AnalysisStatus {
        self.state.lock().status
    }

    /// The result payload, present only when Succeeded
    pub fn report(&self) -> Option<AnalysisReport> {
        self.state.lock().result.clone()
    }

    /// The failure description, present only when Failed
    pub fn error_message(&self) -> Option<String> {
        self.state.lock().error_message.clone()
    }
}
