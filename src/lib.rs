//! Authentication and session-lifecycle core.
//!
//! Layered hexagonally: `domain` holds the entities, ports and services,
//! `application` the per-operation use cases, `infrastructure` the Postgres,
//! Argon2 and JWT implementations, and `adapters` the HTTP surface.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
