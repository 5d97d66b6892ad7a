//! Environment setup builders for exercising the harness.
//!
//! This module provides an in-process plant store double so the fixture
//! layer and the cucumber suite can run without a deployed application.

mod fake_store;

pub use fake_store::*;
