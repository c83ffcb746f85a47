//! Core types and trait definitions for the Folk person service.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! store backends and the API layer both depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod memory;
pub mod person;
pub mod store;

pub use error::{Error, Result};
