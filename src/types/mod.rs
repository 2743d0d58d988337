//! Shared data structures for the hoax classification pipeline
//!
//! This module defines the values that flow through a single request:
//! - Stage 1: NormalizedTokens (normalizer output)
//! - Stage 2: TokenSequence (fixed-length, pre-padded vocabulary ids)
//! - Stage 3: Verdict (class + confidence of the selected class)
//! - Stage 4: Advisory (external or fallback guidance text)
//! - Output: Assessment (verdict paired with exactly one advisory)
//!
//! None of these values outlive the request that produced them.

mod advisory;
mod text;
mod verdict;

pub use advisory::*;
pub use text::*;
pub use verdict::*;
