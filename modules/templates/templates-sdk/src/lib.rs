//! Templates SDK
//!
//! Report templates owned by a user, exposed under the `templates` service name.

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::{TemplatesApi, TemplatesService};
pub use errors::TemplatesError;
pub use models::{NewTemplate, Page, PageRequest, Template, TemplatePatch};
