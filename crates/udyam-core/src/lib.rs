//! Core types and trait definitions for the Udyam registration backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it. The [`registrar::Registrar`] drives an
//! application through the Aadhaar, PAN and final-submission stages against
//! any [`store::ApplicationStore`] and [`verify::IdentityVerifier`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod application;
pub mod attempt;
pub mod codes;
pub mod error;
pub mod redact;
pub mod registrar;
pub mod store;
pub mod verify;

pub use error::{Error, Result};
