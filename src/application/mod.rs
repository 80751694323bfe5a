//! Application layer - services the dashboard views talk to.
//!
//! - `SessionGuard` - staff session state, sign-in and sign-out
//! - `EnvironmentSelector` - persisted backend deployment choice
//! - `AdminApi` - typed admin resource queries and path editing
//! - `AdminConsole` - wiring of the above around one identity provider

mod admin_api;
mod console;
mod environment_selector;
mod session_guard;
pub mod telemetry;

pub use admin_api::{AdminApi, PathEditorError};
pub use console::{AdminConsole, StartupError};
pub use environment_selector::EnvironmentSelector;
pub use session_guard::SessionGuard;
