//! Company handlers: list, read (with invoice ids and industries), create, update, delete.

use crate::error::AppError;
use crate::extractors::{JsonBody, PathParam};
use crate::models::{CompanyChanges, CompanyDetail, NewCompany};
use crate::response::{created, deleted, ok};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

fn company_not_found(code: &str) -> AppError {
    AppError::NotFound(format!("Cannot find company with code of {}", code))
}

/// GET /companies
pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let companies = state.store.list_companies().await?;
    Ok(ok("companies", companies))
}

/// GET /companies/:code — the invoice and industry lookups are separate reads.
pub async fn get_company(
    State(state): State<AppState>,
    PathParam(code): PathParam<String>,
) -> Result<impl IntoResponse, AppError> {
    let company = state
        .store
        .get_company(&code)
        .await?
        .ok_or_else(|| company_not_found(&code))?;
    let invoices = state.store.invoice_ids_for_company(&code).await?;
    let industries = state.store.industry_names_for_company(&code).await?;
    Ok(ok(
        "company",
        CompanyDetail {
            company,
            invoices,
            industries,
        },
    ))
}

/// POST /companies
pub async fn create_company(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewCompany>,
) -> Result<impl IntoResponse, AppError> {
    let company = state.store.create_company(&body).await?;
    tracing::info!(code = %company.code, "company created");
    Ok(created("companies", company))
}

/// PUT /companies/:code
pub async fn update_company(
    State(state): State<AppState>,
    PathParam(code): PathParam<String>,
    JsonBody(body): JsonBody<CompanyChanges>,
) -> Result<impl IntoResponse, AppError> {
    let company = state
        .store
        .update_company(&code, &body)
        .await?
        .ok_or_else(|| company_not_found(&code))?;
    Ok(ok("companies", company))
}

/// DELETE /companies/:code
pub async fn delete_company(
    State(state): State<AppState>,
    PathParam(code): PathParam<String>,
) -> Result<impl IntoResponse, AppError> {
    if state.store.delete_company(&code).await? == 0 {
        return Err(company_not_found(&code));
    }
    tracing::info!(code = %code, "company deleted");
    Ok(deleted())
}
