#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Request context, session store and role primitives.
//!
//! Every resolver and backend call receives an explicit [`RequestContext`]
//! instead of reading tenant, language or token from ambient storage. The
//! context is snapshotted from a [`Session`], whose lifecycle follows
//! login and logout.

pub mod constants;
pub mod context;
pub mod role;
pub mod session;

pub use context::{RequestContext, RequestContextBuilder};
pub use role::{Role, RoleSet, Scope};
pub use session::{Session, SessionKey};
