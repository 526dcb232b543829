//! Keeps the session valid for the lifetime of the process.
//!
//! Three independent pieces: [`Bootstrapper`] reconciles the persisted
//! session with the provider at start-up, [`AuthListener`] follows
//! provider-pushed changes, and [`RefreshScheduler`] refreshes the session
//! shortly before it expires. [`SessionLifecycle`] runs all three.

mod bootstrap;
mod listener;
mod refresh_timer;
mod session_lifecycle;

pub use bootstrap::{BootstrapOutcome, BootstrapPhase, Bootstrapper};
pub use listener::{AuthListener, ListenerHandle};
pub use refresh_timer::{
    REFRESH_THRESHOLD, RefreshHandle, RefreshSchedule, RefreshScheduler, schedule_refresh,
};
pub use session_lifecycle::{LifecycleStatus, SessionLifecycle};
