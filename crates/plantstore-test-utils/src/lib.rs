//! Testing utilities for the plant store end-to-end suite.
//!
//! This crate provides the fixture and lifecycle layer the suite is built on:
//! environment configuration, an authenticated API context, a role token
//! cache, a test-data factory with dependency resolution, per-scenario state
//! with a created-resource ledger, and the cleanup that drains it. An
//! in-process fake store lets the layer and the suite run without a
//! deployed application.

pub mod assertions;
pub mod auth;
pub mod builders;
pub mod cleanup;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod factory;
pub mod ledger;
pub mod logging;
pub mod naming;
pub mod response;

/// BDD testing utilities
#[cfg(feature = "bdd")]
pub mod bdd;

pub use auth::{Credentials, Role, Token, TokenCache};
pub use builders::{FakePlantStoreBuilder, FakePlantStoreHandle};
pub use cleanup::CleanupReport;
pub use client::{ApiContext, RequestOptions};
pub use config::{TestConfig, TokenScope};
pub use context::{ScenarioContext, StepBudget, Suite};
pub use error::{HarnessError, HarnessResult};
pub use factory::{Created, PlantSpec, TestDataFactory};
pub use ledger::{CreatedResources, ResourceKind};
pub use response::{ApiResponse, Listing, Page};
