use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use finrag_service::{
	Error as ServiceError, HealthResponse, QueryRequest, QueryResponse, RetrieveRequest,
	RetrieveResponse,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/query", post(query))
		.route("/retrieve", post(retrieve))
		.with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
	Json(state.service.health().await)
}

async fn query(
	State(state): State<AppState>,
	payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.query(payload).await?;

	Ok(Json(response))
}

async fn retrieve(
	State(state): State<AppState>,
	payload: Result<Json<RetrieveRequest>, JsonRejection>,
) -> Result<Json<RetrieveResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.retrieve_sources(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { field, message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, Some(vec![field])),
			ServiceError::Provider { message } => {
				tracing::error!(error = %message, "Embedding provider failed.");

				json_error(StatusCode::BAD_GATEWAY, "provider_error", message, None)
			},
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Corpus storage failed.");

				json_error(StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable", message, None)
			},
		}
	}
}
impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text(), None)
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
