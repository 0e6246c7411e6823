//! Shell pages of the Scribe frontend.
//!
//! A `RouteResolver` turns a `RouteRequest` for `/app/{slug}`,
//! `/settings/{slug}` or `/auth/{slug}` into a rendered component or a
//! redirect, running the `AccessGate` first.

#![forbid(unsafe_code)]

pub mod gate;
pub mod mount;
pub mod resolver;
pub mod routes;

pub use gate::{AccessGate, DenyReason, GateOutcome, GatePolicy};
pub use mount::Mount;
pub use resolver::{Resolution, RouteResolver};
pub use routes::RoutesConfig;
