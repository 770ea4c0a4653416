//! Resource routes for companies, invoices and industries.

use crate::error::AppError;
use crate::handlers::{
    associate_industry, create_company, create_industry, create_invoice, delete_company,
    delete_invoice, get_company, get_invoice, list_companies, list_industries, list_invoices,
    update_company, update_invoice,
};
use crate::state::AppState;
use axum::http::Method;
use axum::{routing::get, routing::post, Router};

/// Known path, unsupported method.
async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method.to_string())
}

pub fn company_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/companies",
            get(list_companies)
                .post(create_company)
                .fallback(method_not_allowed),
        )
        .route(
            "/companies/:code",
            get(get_company)
                .put(update_company)
                .delete(delete_company)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}

pub fn invoice_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/invoices",
            get(list_invoices)
                .post(create_invoice)
                .fallback(method_not_allowed),
        )
        .route(
            "/invoices/:id",
            get(get_invoice)
                .put(update_invoice)
                .delete(delete_invoice)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}

pub fn industry_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/industries",
            get(list_industries)
                .post(create_industry)
                .fallback(method_not_allowed),
        )
        .route(
            "/industries/associate",
            post(associate_industry).fallback(method_not_allowed),
        )
        .with_state(state)
}
