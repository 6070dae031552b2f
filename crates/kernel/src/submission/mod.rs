//! Submission intake: per-type value sanitizers and the batch pipeline.
//!
//! A submission is an arbitrary JSON object keyed by field name. The
//! pipeline checks it against the form's stored fields and either
//! produces a complete batch of sanitized values or a complete list of
//! errors. Partial batches never exist, which is what lets response
//! persistence be a single transaction.

pub mod pipeline;
pub mod values;

pub use pipeline::sanitize_submission;
pub use values::{SanitizedValue, ValueError};
