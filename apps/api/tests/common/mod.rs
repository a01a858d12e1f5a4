//! Common test utilities for API integration tests
//!
//! Shared setup for an in-memory, seeded database and the application built
//! on top of it.

#![allow(dead_code)]

pub mod helpers;

pub use helpers::*;
