pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

// Re-export for convenience
pub use sign_in::SignInUseCase;
pub use sign_out::SignOutUseCase;
pub use sign_up::SignUpUseCase;
