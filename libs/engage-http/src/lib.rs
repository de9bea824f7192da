#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! HTTP client for the engagement backend API.
//!
//! Pooled hyper connections over rustls with webpki roots. HTTPS only
//! unless the transport allows plain HTTP. Each request has one timeout
//! covering the body read, and bodies are size-limited.
//!
//! # Example
//!
//! ```ignore
//! use engage_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .user_agent("engage/0.1")
//!     .build()?;
//!
//! let tenant: Tenant = client
//!     .get("https://api.example.com/tenants/gdx")
//!     .bearer_auth(token)
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod request;
mod response;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_USER_AGENT, HttpClientConfig, TransportSecurity};
pub use error::{HttpError, UrlRejection};
pub use request::RequestBuilder;
pub use response::HttpResponse;
