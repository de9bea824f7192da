//! Backend implementations.

pub mod rest;
pub mod static_backend;
