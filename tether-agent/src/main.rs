use color_eyre::eyre::Result;
use tether::{
    LifecycleStatus, Settings, SignInInput, TetherClient, adapters::telemetry::init_tracing,
};

const EMAIL_ENV_VAR: &str = "TETHER_AGENT_EMAIL";
const PASSWORD_ENV_VAR: &str = "TETHER_AGENT_PASSWORD";

/// Keeps one session alive: restores it on start, refreshes it before expiry
/// and logs every change until interrupted.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = Settings::load()?;
    let client = TetherClient::from_settings(&settings)?;

    let outcome = client.start().await;
    tracing::info!(?outcome, "Session lifecycle started");

    if client.lifecycle().status() == LifecycleStatus::Unauthenticated {
        if let (Ok(email), Ok(password)) =
            (std::env::var(EMAIL_ENV_VAR), std::env::var(PASSWORD_ENV_VAR))
        {
            match client
                .sign_in()
                .execute(SignInInput::new(email, password))
                .await
            {
                Ok(session) => tracing::info!(user_id = %session.user.id, "Signed in"),
                Err(error) => tracing::error!(code = %error.code(), %error, "Sign-in failed"),
            }
        }
    }

    let mut changes = client.store().subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = changes.borrow_and_update().clone();
                tracing::info!(
                    authenticated = state.is_authenticated(),
                    loading = state.is_loading,
                    expires_at = ?state.expires_at(),
                    error = ?state.error,
                    "Session state changed"
                );
            }
        }
    }

    tracing::info!("Shutting down");
    client.shutdown().await;
    Ok(())
}
