use std::any::Any;

use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error_handler::AppError;

/// Turns a handler panic into the usual JSON 500 body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!(panic = detail, "handler panicked");

    AppError::Internal("unexpected server error".into()).into_response()
}
