//! A REST API for recording personal expenses.
//!
//! Expenses can be listed, searched by description and date range, created,
//! replaced and deleted. Records are stored in SQLite.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod logging;
mod routing;
mod seed;

pub mod expense;

pub use app_state::AppState;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use seed::populate_if_empty;

use crate::expense::{ExpenseId, ValidationError};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A new expense broke one of the create rules.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A search covered more than [expense::MAX_SEARCH_RANGE_DAYS] days.
    #[error("Date range must not exceed {days} days", days = expense::MAX_SEARCH_RANGE_DAYS)]
    InvalidRange,

    /// The ID in an update request's path did not match the ID in its body.
    #[error("The expense ID in the path does not match the body")]
    IdMismatch {
        /// The ID taken from the request path.
        path_id: ExpenseId,
        /// The ID taken from the request body.
        body_id: ExpenseId,
    },

    /// A date in a query string could not be parsed as `YYYY-MM-DD`.
    #[error("Invalid date \"{0}\"")]
    InvalidDate(String),

    /// A request body was not valid JSON or did not have the expected shape,
    /// e.g., a malformed date, a non-numeric amount or a missing field.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The requested expense was not found.
    ///
    /// Internally, this error may occur when a query returns no rows or when
    /// an update or delete affects no rows.
    #[error("Expense not found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(_)
            | Error::InvalidRange
            | Error::IdMismatch { .. }
            | Error::InvalidDate(_)
            | Error::InvalidBody(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details.",
                )
                    .into_response()
            }
        }
    }
}
