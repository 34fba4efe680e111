//! Small helpers for the handful of plain-text error responses the front
//! door returns. Unlike the teacher's JSON `HttpErrorEnvelope` (this crate
//! has no such shared schema for arbitrary worker traffic — a worker's
//! response body is opaque bytes, not a dispatcher-defined shape), these
//! are deliberately just a status code and a short text body, matching
//! spec §4.5's "404 with a short body" wording.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub fn text_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, message.into()).into_response()
}

pub fn not_found(message: impl Into<String>) -> Response {
    text_error(StatusCode::NOT_FOUND, message)
}

pub fn bad_request(message: impl Into<String>) -> Response {
    text_error(StatusCode::BAD_REQUEST, message)
}

pub fn internal_error(message: impl Into<String>) -> Response {
    text_error(StatusCode::INTERNAL_SERVER_ERROR, message)
}

pub fn bad_gateway(message: impl Into<String>) -> Response {
    text_error(StatusCode::BAD_GATEWAY, message)
}

pub fn gateway_timeout(message: impl Into<String>) -> Response {
    text_error(StatusCode::GATEWAY_TIMEOUT, message)
}
