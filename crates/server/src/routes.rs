use axum::{
    extract::{rejection::JsonRejection, State as AxumState},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use common::RequestContext;
use domain::{Call, Principal, Reply};
use tracing::debug;

use crate::error::AppError;
use crate::state::State;

/// Вызывающий из `Authorization: Bearer <principal>`; без заголовка анонимный
pub fn caller_from_headers(headers: &HeaderMap) -> Principal {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(Principal::new)
        .unwrap_or_else(Principal::anonymous)
}

pub async fn rpc_handler(
    AxumState(state): AxumState<State>,
    headers: HeaderMap,
    payload: Result<Json<Call>, JsonRejection>,
) -> Result<Json<Reply>, AppError> {
    let Json(call) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    let caller = caller_from_headers(&headers);
    let context = RequestContext::new().with_caller(caller.to_string());

    let method = call.method();
    let mutation = call.is_mutation();

    let result = state.service.dispatch(&caller, call).await;
    debug!(
        request_id = %context.request_id,
        caller = ?context.caller,
        method,
        mutation,
        ok = result.is_ok(),
        elapsed_ms = context.elapsed_ms(),
        "RPC handled"
    );

    Ok(Json(Reply::Ok(result?)))
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
