use reqwest::StatusCode;
use serde::Deserialize;
use tether_core::AppError;

/// Provider call an error originated from. Status mapping differs per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    SignIn,
    SignUp,
    SignOut,
    Refresh,
    SetSession,
    GetSession,
}

/// Error body of the auth provider. Which field carries the message depends
/// on the endpoint.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProviderErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ProviderErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
            .filter(|message| !message.trim().is_empty())
    }
}

pub(crate) fn map_transport_error(error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::timeout("The auth provider did not respond in time").with_source(error)
    } else if error.is_connect() || error.is_request() {
        AppError::connection("Could not reach the auth provider").with_source(error)
    } else {
        AppError::unknown_from(error)
    }
}

pub(crate) fn map_status(
    status: StatusCode,
    body: ProviderErrorBody,
    operation: Operation,
) -> AppError {
    let message = body.into_message().unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Auth provider request failed")
            .to_string()
    });

    match status {
        StatusCode::BAD_REQUEST
        | StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::UNPROCESSABLE_ENTITY => AppError::unauthorized(message),
        // An existing account is a rejected sign-up, not a write conflict.
        StatusCode::CONFLICT if operation == Operation::SignUp => AppError::unauthorized(message),
        StatusCode::CONFLICT => AppError::conflict(message),
        StatusCode::NOT_FOUND => AppError::not_found(message),
        _ => AppError::unknown(message),
    }
}
