pub mod lifecycle;
pub mod persistence;
pub mod session_store;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

pub use lifecycle::{
    AuthListener, BootstrapOutcome, BootstrapPhase, Bootstrapper, LifecycleStatus, ListenerHandle,
    REFRESH_THRESHOLD, RefreshHandle, RefreshSchedule, RefreshScheduler, SessionLifecycle,
    schedule_refresh,
};
pub use persistence::PersistedState;
pub use session_store::{Hydration, SESSION_STORE_NAME, SessionState, SessionStore};
pub use use_cases::{SignInUseCase, SignOutUseCase, SignUpUseCase};
