//! Database models.

pub mod form;
pub mod response;

pub use form::{FieldValidation, StoredField, StoredForm};
pub use response::{FormResponse, ResponseValue, ResponseValueRow};
