//! Backend over the platform's REST API.

mod client;
pub mod endpoints;

pub use client::{RestBackend, RestSetupError};
