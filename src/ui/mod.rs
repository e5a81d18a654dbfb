//! UI-facing glue for the session core
//!
//! Context wiring and small helpers the component tree uses; no views
//! live in this crate.

pub mod cooldown;
pub mod session_context;

pub use cooldown::{CooldownHandle, DEFAULT_COOLDOWN_SECS, start_cooldown};
pub use session_context::{SessionContext, provide_session_context, use_session_context};
