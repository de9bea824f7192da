//! Engagement Access Module
//!
//! Resolves the tenant and active language for a navigation, gates protected
//! content on the user's roles and assembles per-route data bags from the
//! backend REST API.
//!
//! The module exposes [`AccessLocalClient`] as the in-process implementation
//! of [`engagement_access_sdk::AccessClient`]. Backends are pluggable:
//! [`infra::rest::RestBackend`] talks to the real API and
//! [`infra::static_backend::StaticBackend`] serves configuration-seeded data.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod infra;

pub use config::{AccessConfig, BackendConfig, StaticBackendConfig, WidgetDocuments};
pub use domain::local_client::AccessLocalClient;
pub use domain::service::Service;
