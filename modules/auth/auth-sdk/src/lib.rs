//! Auth SDK
//!
//! Public contract of the auth capability (`oauth` service name):
//! - `AuthApi` trait for sign-up, sign-in, sessions and account updates
//! - Model types (`User`, `AuthSession`, `OAuthProvider`, ...)
//! - Error type (`AuthError`)
//!
//! Consumers resolve it through the module manager:
//! ```ignore
//! let auth = manager.components().require_service::<OAuthService>()?;
//! let user = auth.get_logged_user(&token).await?;
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::{AuthApi, OAuthService};
pub use errors::AuthError;
pub use models::{AuthSession, OAuthProvider, OAuthRedirect, User, UserUpdate};
