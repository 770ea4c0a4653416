//! Router assembly: resource routes, common routes, fallback and middleware.

mod common;
mod resources;

pub use common::common_routes;
pub use resources::{company_routes, industry_routes, invoice_routes};

use crate::error::AppError;
use crate::state::AppState;
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body, in bytes.
pub const BODY_LIMIT: usize = 64 * 1024;

async fn route_not_found() -> AppError {
    AppError::NotFound("Not Found".into())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    AppError::Unhandled(format!("handler panicked: {}", detail)).into_response()
}

/// Full application router. Every failure, including unknown routes,
/// unsupported methods, undecodable path segments and panics, is answered
/// with `{"error": {"message", "status"}}`. Oversized bodies are the
/// exception: the body limit layer answers 413 itself.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(company_routes(state.clone()))
        .merge(invoice_routes(state.clone()))
        .merge(industry_routes(state))
        .fallback(route_not_found)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}
