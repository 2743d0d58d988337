//! Per-request state machine
//!
//! ```text
//! RECEIVED → NORMALIZED → SEQUENCED → CLASSIFIED → ADVISED → DONE
//!     │           │            │
//!     └───────────┴────────────┴──→ REJECTED
//! ```
//!
//! `REJECTED` is reachable from `RECEIVED` (empty or too-short input) and
//! from `NORMALIZED` (no vocabulary hits). A model failure after
//! `SEQUENCED` ends the request without a terminal stage.

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStage {
    Received,
    Normalized,
    Sequenced,
    Classified,
    Advised,
    Done,
    Rejected,
}

impl RequestStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "RECEIVED",
            Self::Normalized => "NORMALIZED",
            Self::Sequenced => "SEQUENCED",
            Self::Classified => "CLASSIFIED",
            Self::Advised => "ADVISED",
            Self::Done => "DONE",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Rejected)
    }

    /// Whether `next` may directly follow `self`.
    pub fn can_transition_to(&self, next: RequestStage) -> bool {
        use RequestStage::*;
        matches!(
            (self, next),
            (Received, Normalized)
                | (Received, Rejected)
                | (Normalized, Sequenced)
                | (Normalized, Rejected)
                | (Sequenced, Classified)
                | (Classified, Advised)
                | (Advised, Done)
        )
    }
}

impl std::fmt::Display for RequestStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered record of the stages one request passed through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageTrace {
    stages: Vec<RequestStage>,
}

impl StageTrace {
    pub fn new() -> Self {
        debug!(stage = %RequestStage::Received, "Request stage");
        Self {
            stages: vec![RequestStage::Received],
        }
    }

    pub fn current(&self) -> RequestStage {
        self.stages
            .last()
            .copied()
            .unwrap_or(RequestStage::Received)
    }

    /// Move to `next`. Illegal transitions are ignored and return false.
    pub fn advance(&mut self, next: RequestStage) -> bool {
        let current = self.current();
        if !current.can_transition_to(next) {
            debug!(from = %current, to = %next, "Ignoring illegal stage transition");
            return false;
        }
        debug!(stage = %next, "Request stage");
        self.stages.push(next);
        true
    }

    pub fn stages(&self) -> &[RequestStage] {
        &self.stages
    }

    pub fn reached(&self, stage: RequestStage) -> bool {
        self.stages.contains(&stage)
    }
}

impl Default for StageTrace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::RequestStage::*;
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut trace = StageTrace::new();
        for stage in [Normalized, Sequenced, Classified, Advised, Done] {
            assert!(trace.advance(stage), "{stage} should be allowed");
        }
        assert_eq!(
            trace.stages(),
            &[Received, Normalized, Sequenced, Classified, Advised, Done]
        );
        assert!(trace.current().is_terminal());
    }

    #[test]
    fn test_rejection_points() {
        assert!(Received.can_transition_to(Rejected));
        assert!(Normalized.can_transition_to(Rejected));
        assert!(!Sequenced.can_transition_to(Rejected));
        assert!(!Classified.can_transition_to(Rejected));
    }

    #[test]
    fn test_illegal_transition_ignored() {
        let mut trace = StageTrace::new();
        assert!(!trace.advance(Classified));
        assert_eq!(trace.current(), Received);
        assert!(!trace.reached(Classified));
    }

    #[test]
    fn test_terminal_stages_have_no_successor() {
        let all = [Received, Normalized, Sequenced, Classified, Advised, Done, Rejected];
        for next in all {
            assert!(!Done.can_transition_to(next));
            assert!(!Rejected.can_transition_to(next));
        }
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&Advised).unwrap(), "\"ADVISED\"");
        assert_eq!(Rejected.to_string(), "REJECTED");
    }
}
