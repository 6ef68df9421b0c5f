//! Core types and trait definitions for the formdrop submission service.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the submission-intake pipeline (decode, validate, enrich, persist, notify)
//! and the collaborator traits the other crates implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod form;
pub mod gate;
pub mod notify;
pub mod pipeline;
pub mod store;
pub mod submission;

pub use error::{DecodeError, IntakeError, ValidationError};
pub use gate::{ConfigGate, GateState};
pub use pipeline::Intake;
pub use submission::{Fields, RequestOrigin, Submission};
