//! Session state for the signed-in user.
//!
//! # Module Structure
//!
//! - `state`: derived session state (`SessionPhase`, `SessionSnapshot`)
//! - `context`: the session facade (`SessionContext`)
//! - `error`: transition failures (`SessionError`)
//!
//! Exactly one [`SessionContext`] is created at startup and passed, usually
//! behind an `Arc`, to everything that needs to know who the user is.
//!
//! # Usage
//!
//! ```ignore
//! let session = Arc::new(SessionContext::new(tokens, auth, profiles, navigator, settings)?);
//! let _listener = session.spawn_storage_listener();
//! session.login(&AuthenticationRequest::new("alice", "secret"), true).await?;
//! if session.has_any_role(&["ADMIN", "ROLE_ADMIN"]) { /* ... */ }
//! ```

mod context;
mod error;
mod state;

pub use context::{SessionContext, StorageSync};
pub use error::SessionError;
pub use state::{SessionPhase, SessionSnapshot};
