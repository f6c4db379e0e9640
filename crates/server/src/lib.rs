use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run_with_listener, spawn_with_listener};

mod accounts;
mod recurring;
mod server;
mod transfers;
mod user;

pub mod types {
    pub mod account {
        pub use api_types::account::{AccountNew, AccountStatusUpdate, AccountView, CategoryNew, Created};
    }

    pub mod transfer {
        pub use api_types::transfer::{
            TransferListResponse, TransferNew, TransferUpdate, TransferView,
        };
    }

    pub mod fixed_expense {
        pub use api_types::fixed_expense::{
            FixedExpenseNew, OccurrenceQuery, OccurrenceResponse, ProcessResponse,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InsufficientFunds(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidDate(_)
        | EngineError::InvalidRecurrence(_)
        | EngineError::InvalidStatus(_)
        | EngineError::InvalidId(_)
        | EngineError::StaleSchedule(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let status =
            status_for_engine_error(&EngineError::KeyNotFound("transfer not exists".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn insufficient_funds_maps_to_422() {
        let status =
            status_for_engine_error(&EngineError::InsufficientFunds("account x".to_string()));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn database_error_is_redacted() {
        let message = message_for_engine_error(EngineError::Database(
            sea_orm::DbErr::Custom("secret detail".to_string()),
        ));
        assert_eq!(message, "internal server error");
    }
}
