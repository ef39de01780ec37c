use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::DashboardError;
use domain::Reply;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Dashboard(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Dashboard(DashboardError::Unauthorized(_)) => StatusCode::UNAUTHORIZED,
            AppError::Dashboard(DashboardError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Dashboard(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn reply(&self) -> Reply {
        match self {
            AppError::MalformedPayload(reason) => Reply::err("VALIDATION_ERROR", reason.clone()),
            AppError::Dashboard(err) => Reply::Err(err.to_wire()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("RPC failed: {}", self);
        } else {
            warn!("RPC rejected ({}): {}", status.as_u16(), self);
        }

        (status, Json(self.reply())).into_response()
    }
}
