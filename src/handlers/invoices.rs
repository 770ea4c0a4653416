//! Invoice handlers. Only `amt` is mutable after creation.

use crate::error::AppError;
use crate::extractors::{JsonBody, PathParam};
use crate::models::{InvoiceChanges, NewInvoice};
use crate::response::{created, deleted, ok};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

fn parse_id(id_str: &str) -> Result<i32, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid invoice id: {}", id_str)))
}

fn invoice_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Cannot find invoice with id of {}", id))
}

/// GET /invoices
pub async fn list_invoices(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let invoices = state.store.list_invoices().await?;
    Ok(ok("invoices", invoices))
}

/// GET /invoices/:id
pub async fn get_invoice(
    State(state): State<AppState>,
    PathParam(id_str): PathParam<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let invoice = state
        .store
        .get_invoice(id)
        .await?
        .ok_or_else(|| invoice_not_found(id))?;
    Ok(ok("invoices", invoice))
}

/// POST /invoices — missing `comp_code` or `amt` is rejected by the NOT NULL
/// constraints and surfaces as 400.
pub async fn create_invoice(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewInvoice>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state.store.create_invoice(&body).await?;
    tracing::info!(id = invoice.id, comp_code = %invoice.comp_code, "invoice created");
    Ok(created("invoices", invoice))
}

/// PUT /invoices/:id
pub async fn update_invoice(
    State(state): State<AppState>,
    PathParam(id_str): PathParam<String>,
    JsonBody(body): JsonBody<InvoiceChanges>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let invoice = state
        .store
        .update_invoice(id, &body)
        .await?
        .ok_or_else(|| invoice_not_found(id))?;
    Ok(ok("invoices", invoice))
}

/// DELETE /invoices/:id
pub async fn delete_invoice(
    State(state): State<AppState>,
    PathParam(id_str): PathParam<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if state.store.delete_invoice(id).await? == 0 {
        return Err(invoice_not_found(id));
    }
    Ok(deleted())
}
