//! Form definition subsystem.
//!
//! Turns markdown form sources into structured definitions and judges
//! their structural acceptability:
//! - [`markdown::parse_markdown`] compiles the dialect, best-effort
//! - [`validate::validate_form_structure`] accumulates structural errors
//!
//! Compilation never fails and validation never short-circuits, so a form
//! author always sees the complete picture for a given source text.

pub mod markdown;
pub mod types;
pub mod validate;

pub use markdown::parse_markdown;
pub use types::{Field, FieldType, FormDefinition, Section};
pub use validate::{ValidationResult, validate_form_structure};
