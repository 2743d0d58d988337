//! Orchestrator: Normalizer → Sequencer → Classifier → advisory.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{RequestStage, StageTrace};
use crate::advisory::{AdvisoryClient, FallbackAdvisor};
use crate::classifier::{Classifier, ModelError};
use crate::config::ValidinConfig;
use crate::text::{Normalizer, SequenceError, Sequencer};
use crate::types::{Advisory, Assessment, Verdict};

/// Why a submitted text was refused before sequencing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("text is empty")]
    Empty,
    #[error("text has {chars} characters, minimum is {min}")]
    TooShort { chars: usize, min: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("input rejected: {0}")]
    InputRejected(RejectReason),
    #[error("input could not be sequenced: {0}")]
    EmptySequence(#[from] SequenceError),
    #[error("model inference failed: {0}")]
    ModelInference(#[from] ModelError),
}

impl PipelineError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InputRejected(_) => "INPUT_REJECTED",
            Self::EmptySequence(_) => "EMPTY_SEQUENCE",
            Self::ModelInference(_) => "MODEL_INFERENCE_FAILURE",
        }
    }

    /// Message shown to the person who submitted the text.
    pub fn user_message(&self) -> String {
        match self {
            Self::InputRejected(RejectReason::Empty) => "Mohon masukkan teks berita!".to_string(),
            Self::InputRejected(RejectReason::TooShort { min, .. }) => {
                format!("Teks terlalu pendek. Masukkan minimal {min} karakter.")
            }
            Self::EmptySequence(_) => "Teks tidak dapat diproses. Pastikan teks relevan.".to_string(),
            Self::ModelInference(_) => {
                "Model klasifikasi sedang tidak tersedia. Coba lagi nanti.".to_string()
            }
        }
    }

    /// Whether the caller caused the failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::ModelInference(_))
    }
}

/// Outcome of one request together with the stages it passed through.
#[derive(Debug)]
pub struct PipelineRun {
    pub trace: StageTrace,
    pub result: Result<Assessment, PipelineError>,
}

/// Runs one submitted text through the full pipeline.
///
/// All collaborators are immutable after construction and shared across
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    normalizer: Arc<Normalizer>,
    sequencer: Sequencer,
    classifier: Classifier,
    advisory: Option<AdvisoryClient>,
    fallback: FallbackAdvisor,
    min_chars: usize,
}

impl Orchestrator {
    pub fn new(
        normalizer: Arc<Normalizer>,
        sequencer: Sequencer,
        classifier: Classifier,
        advisory: Option<AdvisoryClient>,
        config: &ValidinConfig,
    ) -> Self {
        Self {
            normalizer,
            sequencer,
            classifier,
            advisory,
            fallback: FallbackAdvisor::new(&config.fallback),
            min_chars: config.input.min_chars,
        }
    }

    /// Whether an external advisory client is wired in.
    pub fn advisory_enabled(&self) -> bool {
        self.advisory.is_some()
    }

    pub async fn assess(&self, text: &str) -> Result<Assessment, PipelineError> {
        self.run(text).await.result
    }

    pub async fn run(&self, text: &str) -> PipelineRun {
        let started = Instant::now();
        let mut trace = StageTrace::new();
        let result = self.drive(text, &mut trace).await;

        match &result {
            Ok(assessment) => info!(
                class = %assessment.verdict.class,
                confidence = assessment.verdict.confidence,
                advisory_source = ?assessment.advisory.source,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Assessment complete"
            ),
            Err(e) if e.is_rejection() => info!(code = e.code(), error = %e, "Request rejected"),
            Err(e) => warn!(code = e.code(), error = %e, "Request failed"),
        }

        PipelineRun { trace, result }
    }

    async fn drive(&self, text: &str, trace: &mut StageTrace) -> Result<Assessment, PipelineError> {
        let chars = text.trim().chars().count();
        debug!(chars, "Request received");

        if let Err(reason) = self.check_length(chars) {
            trace.advance(RequestStage::Rejected);
            return Err(PipelineError::InputRejected(reason));
        }

        let tokens = self.normalizer.normalize(text);
        trace.advance(RequestStage::Normalized);
        debug!(tokens = tokens.len(), "Text normalized");

        let sequence = match self.sequencer.sequence(&tokens) {
            Ok(seq) => seq,
            Err(e) => {
                trace.advance(RequestStage::Rejected);
                return Err(e.into());
            }
        };
        trace.advance(RequestStage::Sequenced);

        let verdict = self.classifier.classify(&sequence).await?;
        trace.advance(RequestStage::Classified);

        let advisory = self.advise(text, &verdict).await;
        trace.advance(RequestStage::Advised);
        trace.advance(RequestStage::Done);

        Ok(Assessment { verdict, advisory })
    }

    fn check_length(&self, chars: usize) -> Result<(), RejectReason> {
        if chars == 0 {
            return Err(RejectReason::Empty);
        }
        if chars < self.min_chars {
            return Err(RejectReason::TooShort {
                chars,
                min: self.min_chars,
            });
        }
        Ok(())
    }

    /// External advisory first; any failure degrades to the template.
    async fn advise(&self, text: &str, verdict: &Verdict) -> Advisory {
        let Some(client) = &self.advisory else {
            return self.fallback.advise(verdict);
        };

        match client.advise(text, verdict).await {
            Ok(advisory) => advisory,
            Err(e) => {
                warn!(
                    code = e.code(),
                    transient = e.is_transient(),
                    error = %e,
                    "External advisory unavailable, using fallback template"
                );
                self.fallback.advise(verdict).with_degraded_reason(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::{ChatRequest, ChatTransport, TransportError, TransportResponse};
    use crate::classifier::InferenceModel;
    use crate::text::KerasVocabulary;
    use crate::types::{AdvisorySource, NewsClass, TokenSequence};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const HOAX_TEXT: &str = "Beredar kabar vaksin mengandung chip pelacak yang disebar lewat grup pesan berantai";

    struct CountingModel {
        probs: Vec<f64>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl InferenceModel for CountingModel {
        async fn predict(&self, _sequence: &TokenSequence) -> Result<Vec<f64>, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.probs.clone())
        }

        fn backend_name(&self) -> &'static str {
            "counting"
        }
    }

    struct BrokenModel;

    #[async_trait]
    impl InferenceModel for BrokenModel {
        async fn predict(&self, _sequence: &TokenSequence) -> Result<Vec<f64>, ModelError> {
            Err(ModelError::Transport("connection refused".into()))
        }

        fn backend_name(&self) -> &'static str {
            "broken"
        }
    }

    struct FixedTransport(Result<TransportResponse, TransportError>);

    #[async_trait]
    impl ChatTransport for FixedTransport {
        async fn send(&self, _request: &ChatRequest) -> Result<TransportResponse, TransportError> {
            self.0.clone()
        }
    }

    fn orchestrator(
        model: Arc<dyn InferenceModel>,
        transport: Option<Result<TransportResponse, TransportError>>,
    ) -> Orchestrator {
        orchestrator_with(model, transport, &ValidinConfig::default())
    }

    fn orchestrator_with(
        model: Arc<dyn InferenceModel>,
        transport: Option<Result<TransportResponse, TransportError>>,
        config: &ValidinConfig,
    ) -> Orchestrator {
        let vocab: KerasVocabulary = [("kabar", 3), ("vaksin", 7), ("chip", 12), ("pelacak", 40)]
            .into_iter()
            .collect();
        let advisory = transport.map(|t| AdvisoryClient::new(Arc::new(FixedTransport(t)), &config.advisory));
        Orchestrator::new(
            Arc::new(Normalizer::indonesian().unwrap()),
            Sequencer::new(Arc::new(vocab), config.classifier.max_len),
            Classifier::new(model, &config.classifier),
            advisory,
            config,
        )
    }

    fn counting(probs: Vec<f64>) -> Arc<CountingModel> {
        Arc::new(CountingModel {
            probs,
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_short_text_rejected_before_model() {
        let model = counting(vec![0.1, 0.9]);
        let orch = orchestrator(model.clone(), None);

        let run = orch.run("   terlalu pendek   ").await;
        match run.result {
            Err(PipelineError::InputRejected(RejectReason::TooShort { chars, min })) => {
                assert_eq!(chars, 14);
                assert_eq!(min, 50);
            }
            other => panic!("expected TooShort, got {other:?}"),
        }
        assert_eq!(run.trace.stages(), &[RequestStage::Received, RequestStage::Rejected]);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_short_text_message_follows_configured_minimum() {
        let mut config = ValidinConfig::default();
        config.input.min_chars = 100;
        let model = counting(vec![0.1, 0.9]);
        let orch = orchestrator_with(model.clone(), None, &config);

        let text = "Kabar vaksin mengandung chip pelacak beredar luas di media sosial.";
        let err = orch.assess(text).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InputRejected(RejectReason::TooShort { min: 100, .. })
        ));
        assert_eq!(err.user_message(), "Teks terlalu pendek. Masukkan minimal 100 karakter.");
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_whitespace_only_is_empty() {
        let orch = orchestrator(counting(vec![0.5, 0.5]), None);
        let err = orch.assess(" \n\t ").await.unwrap_err();
        assert!(matches!(err, PipelineError::InputRejected(RejectReason::Empty)));
        assert_eq!(err.code(), "INPUT_REJECTED");
        assert_eq!(err.user_message(), "Mohon masukkan teks berita!");
    }

    #[tokio::test]
    async fn test_unknown_words_rejected_as_empty_sequence() {
        let model = counting(vec![0.5, 0.5]);
        let orch = orchestrator(model.clone(), None);
        let run = orch
            .run("Zzzz qqqq wwww xxxx yyyy zzzz qqqq wwww xxxx yyyy zzzz qqqq")
            .await;

        let err = run.result.unwrap_err();
        assert_eq!(err.code(), "EMPTY_SEQUENCE");
        assert_eq!(err.user_message(), "Teks tidak dapat diproses. Pastikan teks relevan.");
        assert_eq!(run.trace.current(), RequestStage::Rejected);
        assert!(run.trace.reached(RequestStage::Normalized));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_client_uses_fallback() {
        let orch = orchestrator(counting(vec![0.05, 0.95]), None);
        assert!(!orch.advisory_enabled());

        let run = orch.run(HOAX_TEXT).await;
        let assessment = run.result.unwrap();
        assert_eq!(assessment.verdict.class, NewsClass::Hoax);
        assert!((assessment.verdict.confidence - 95.0).abs() < 1e-9);
        assert_eq!(assessment.advisory.source, AdvisorySource::Fallback);
        assert!(assessment.advisory.degraded_reason.is_none());
        assert_eq!(run.trace.current(), RequestStage::Done);
        assert_eq!(run.trace.stages().len(), 6);
    }

    #[tokio::test]
    async fn test_external_advisory_used_when_available() {
        let body = serde_json::json!({"choices": [{"message": {"content": "Saran eksternal"}}]}).to_string();
        let orch = orchestrator(
            counting(vec![0.9, 0.1]),
            Some(Ok(TransportResponse { status: 200, body })),
        );
        let assessment = orch.assess(HOAX_TEXT).await.unwrap();
        assert_eq!(assessment.verdict.class, NewsClass::Valid);
        assert!((assessment.verdict.confidence - 90.0).abs() < 1e-9);
        assert_eq!(assessment.advisory, Advisory::external("Saran eksternal"));
    }

    #[tokio::test]
    async fn test_permanent_advisory_failure_degrades() {
        let orch = orchestrator(
            counting(vec![0.2, 0.8]),
            Some(Ok(TransportResponse {
                status: 500,
                body: "internal".into(),
            })),
        );
        let assessment = orch.assess(HOAX_TEXT).await.unwrap();
        assert_eq!(assessment.advisory.source, AdvisorySource::Fallback);
        assert!(assessment.advisory.text.contains("sebagai HOAX"));
        let reason = assessment.advisory.degraded_reason.unwrap();
        assert!(reason.contains("500"));
        assert!(reason.contains("internal"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_degrade_to_class_template() {
        let orch = orchestrator(counting(vec![0.7, 0.3]), Some(Err(TransportError::Timeout)));
        let run = orch.run(HOAX_TEXT).await;
        let assessment = run.result.unwrap();

        assert_eq!(assessment.verdict.class, NewsClass::Valid);
        assert!(assessment.advisory.is_fallback());
        assert!(assessment.advisory.text.contains("sebagai VALID"));
        assert!(run.trace.reached(RequestStage::Advised));
    }

    #[tokio::test]
    async fn test_model_failure_is_fatal() {
        let orch = orchestrator(Arc::new(BrokenModel), None);
        let run = orch.run(HOAX_TEXT).await;
        let err = run.result.unwrap_err();

        assert_eq!(err.code(), "MODEL_INFERENCE_FAILURE");
        assert!(!err.is_rejection());
        assert_eq!(run.trace.current(), RequestStage::Sequenced);
        assert!(!run.trace.current().is_terminal());
    }

    #[tokio::test]
    async fn test_threshold_boundary_is_valid() {
        let orch = orchestrator(counting(vec![0.4, 0.6]), None);
        let assessment = orch.assess(HOAX_TEXT).await.unwrap();
        assert_eq!(assessment.verdict.class, NewsClass::Valid);
    }
}
