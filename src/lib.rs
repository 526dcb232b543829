//! # Tether - Client Session Lifecycle Library
//!
//! This is a facade crate that re-exports the public APIs of the tether components.
//! Use this crate to keep an authenticated session alive from one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! tether = { path = "../tether" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Session`, `User`, `Credentials`, `AppError`
//! - **Ports**: `AuthRepository`, `SecureStorage`
//! - **Application**: `SessionStore`, `SessionLifecycle`, the sign-in/up/out use cases
//! - **Adapters**: `HttpAuthRepository`, `InMemoryAuthRepository`, `FileSecureStorage`, etc.
//! - **Client**: `TetherClient` - The main entry point

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use tether_core::*;
}

// Re-export most commonly used core types at the root level
pub use tether_core::{
    AppError, AuthChangeEvent, Credentials, Email, ErrorCode, NetworkFailure, Password, Session,
    SignInInput, SignUpInput, User,
};

// ============================================================================
// Ports
// ============================================================================

/// Capability interfaces implemented by adapters
pub mod ports {
    pub use tether_core::{
        AuthChangeCallback, AuthRepository, SecureStorage, StorageKey, Subscription,
    };
}

pub use ports::{AuthRepository, SecureStorage, StorageKey, Subscription};

// ============================================================================
// Application Layer
// ============================================================================

/// Session store, lifecycle and use cases
pub mod application {
    pub use tether_application::*;
}

pub use tether_application::{
    BootstrapOutcome, LifecycleStatus, SessionLifecycle, SessionState, SessionStore,
    SignInUseCase, SignOutUseCase, SignUpUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Auth provider implementations
    pub mod auth {
        pub use tether_adapters::auth::*;
    }

    /// Secure storage implementations
    pub mod persistence {
        pub use tether_adapters::persistence::*;
    }

    /// Settings loading
    pub mod config {
        pub use tether_adapters::config::*;
    }

    /// Tracing setup
    pub mod telemetry {
        pub use tether_adapters::telemetry::*;
    }

    pub use tether_adapters::AuthEventBus;
}

pub use tether_adapters::{
    FileSecureStorage, HttpAuthRepository, InMemoryAuthRepository, InMemorySecureStorage,
    Settings,
};

// ============================================================================
// Client (Composition Root)
// ============================================================================

pub use tether_client::{ServiceRegistry, TetherClient, TetherClientBuilder};

// ============================================================================
// Re-exports of common dependencies
// ============================================================================

pub use async_trait::async_trait;
pub use secrecy::{ExposeSecret, Secret};
