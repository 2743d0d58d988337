//! Classification Pipeline Module
//!
//! ```text
//! STAGE 1: Length gate (empty / < min_chars → REJECTED)
//! STAGE 2: Normalizer (lower-case, strip, stop words)
//! STAGE 3: Sequencer (vocabulary ids, pre-padded to max_len; no hits → REJECTED)
//! STAGE 4: Classifier (model inference + strict threshold)
//! STAGE 5: Advisory (external client, template fallback on any failure)
//! ```
//!
//! Stages run sequentially within one request. Failures before stage 4 are
//! user-visible rejections; a stage 4 failure is fatal to the request; a
//! stage 5 failure never prevents delivery of the verdict.

mod orchestrator;
mod state;

pub use orchestrator::{Orchestrator, PipelineError, PipelineRun, RejectReason};
pub use state::{RequestStage, StageTrace};
