//! Modulo Kernel Library
//!
//! This library exposes kernel internals for integration testing.
//! The main entry point for running the server is the `modulo` binary.

pub mod error;
pub mod form;
pub mod models;
pub mod sanitize;
pub mod submission;
