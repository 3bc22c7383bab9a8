//! Identity module — registration, sign-in and permissions
//!
//! Contains the `IdentityService` which provisions new accounts together with
//! their favourites playlist in a single unit of work.

pub mod service;

pub use service::{IdentityService, IdentityServiceBuilder};
