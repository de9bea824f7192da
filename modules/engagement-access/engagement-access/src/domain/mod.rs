//! Domain layer for engagement access.

pub mod deferred;
pub mod documents;
pub mod error;
pub mod language_resolver;
pub mod loaders;
pub mod local_client;
pub mod navigation;
pub mod permission_gate;
pub mod routes;
pub mod service;
pub mod templates;
pub mod tenant_resolver;
pub mod widgets;


pub use deferred::Deferred;
pub use error::DomainError;
pub use navigation::{NavigationGuard, Navigator};
pub use permission_gate::{GatePolicy, Gated, InjectErrorProps, PermissionGate, can_render};
pub use routes::{RouteKind, RouteMatch, RouteTable};
