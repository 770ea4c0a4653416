//! Data store seam. Handlers only talk to `dyn Store`; `PgStore` backs
//! production and `MemoryStore` backs tests and database-less runs.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::models::{
    Association, Company, CompanyChanges, Industry, IndustryCompanyRow, Invoice, InvoiceChanges,
    NewCompany, NewIndustry, NewInvoice,
};
use async_trait::async_trait;

/// Single-statement operations over the four tables.
///
/// Update and delete return `None` / `0` when no row matched; turning that
/// into a 404 is the caller's job. Constraint failures come back as
/// `AppError::Validation` (NOT NULL, CHECK) or an unhandled error (unique,
/// foreign key).
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap liveness probe used by `/ready`.
    async fn ping(&self) -> Result<(), AppError>;

    async fn list_companies(&self) -> Result<Vec<Company>, AppError>;
    async fn get_company(&self, code: &str) -> Result<Option<Company>, AppError>;
    async fn invoice_ids_for_company(&self, code: &str) -> Result<Vec<i32>, AppError>;
    async fn industry_names_for_company(&self, code: &str) -> Result<Vec<String>, AppError>;
    async fn create_company(&self, new: &NewCompany) -> Result<Company, AppError>;
    async fn update_company(
        &self,
        code: &str,
        changes: &CompanyChanges,
    ) -> Result<Option<Company>, AppError>;
    /// Returns the number of rows deleted.
    async fn delete_company(&self, code: &str) -> Result<u64, AppError>;

    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError>;
    async fn get_invoice(&self, id: i32) -> Result<Option<Invoice>, AppError>;
    async fn create_invoice(&self, new: &NewInvoice) -> Result<Invoice, AppError>;
    async fn update_invoice(
        &self,
        id: i32,
        changes: &InvoiceChanges,
    ) -> Result<Option<Invoice>, AppError>;
    async fn delete_invoice(&self, id: i32) -> Result<u64, AppError>;

    async fn create_industry(&self, new: &NewIndustry) -> Result<Industry, AppError>;
    /// Industries left-joined with their associations, ordered by industry
    /// code then company code. Unassociated industries yield one row with
    /// `comp_code: None`.
    async fn industry_company_rows(&self) -> Result<Vec<IndustryCompanyRow>, AppError>;
    async fn associate(&self, link: &Association) -> Result<(), AppError>;
}
