//! PostgreSQL store: one parameterized statement per operation.

use super::Store;
use crate::error::AppError;
use crate::models::{
    Association, Company, CompanyChanges, Industry, IndustryCompanyRow, Invoice, InvoiceChanges,
    NewCompany, NewIndustry, NewInvoice,
};
use async_trait::async_trait;
use sqlx::PgPool;

const INVOICE_COLUMNS: &str = "id, comp_code, amt, paid, add_date, paid_date";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        let sql = "SELECT code, name, description FROM companies ORDER BY code";
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Company>(sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get_company(&self, code: &str) -> Result<Option<Company>, AppError> {
        let sql = "SELECT code, name, description FROM companies WHERE code = $1";
        tracing::debug!(sql = %sql, code = %code, "query");
        let row = sqlx::query_as::<_, Company>(sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn invoice_ids_for_company(&self, code: &str) -> Result<Vec<i32>, AppError> {
        let sql = "SELECT id FROM invoices WHERE comp_code = $1 ORDER BY id";
        tracing::debug!(sql = %sql, code = %code, "query");
        let ids: Vec<(i32,)> = sqlx::query_as(sql).bind(code).fetch_all(&self.pool).await?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    async fn industry_names_for_company(&self, code: &str) -> Result<Vec<String>, AppError> {
        let sql = "SELECT i.industry FROM industries i \
                   JOIN company_industries ci ON i.code = ci.industry_code \
                   WHERE ci.comp_code = $1 ORDER BY i.code";
        tracing::debug!(sql = %sql, code = %code, "query");
        let names: Vec<(String,)> = sqlx::query_as(sql).bind(code).fetch_all(&self.pool).await?;
        Ok(names.into_iter().map(|(n,)| n).collect())
    }

    async fn create_company(&self, new: &NewCompany) -> Result<Company, AppError> {
        let sql = "INSERT INTO companies (code, name, description) VALUES ($1, $2, $3) \
                   RETURNING code, name, description";
        tracing::debug!(sql = %sql, params = ?new, "query");
        let row = sqlx::query_as::<_, Company>(sql)
            .bind(&new.code)
            .bind(&new.name)
            .bind(&new.description)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_company(
        &self,
        code: &str,
        changes: &CompanyChanges,
    ) -> Result<Option<Company>, AppError> {
        let sql = "UPDATE companies SET name = $1, description = $2 WHERE code = $3 \
                   RETURNING code, name, description";
        tracing::debug!(sql = %sql, code = %code, params = ?changes, "query");
        let row = sqlx::query_as::<_, Company>(sql)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_company(&self, code: &str) -> Result<u64, AppError> {
        let sql = "DELETE FROM companies WHERE code = $1";
        tracing::debug!(sql = %sql, code = %code, "query");
        let done = sqlx::query(sql).bind(code).execute(&self.pool).await?;
        Ok(done.rows_affected())
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let sql = format!("SELECT {} FROM invoices ORDER BY id", INVOICE_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Invoice>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get_invoice(&self, id: i32) -> Result<Option<Invoice>, AppError> {
        let sql = format!("SELECT {} FROM invoices WHERE id = $1", INVOICE_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Invoice>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_invoice(&self, new: &NewInvoice) -> Result<Invoice, AppError> {
        let sql = format!(
            "INSERT INTO invoices (comp_code, amt) VALUES ($1, $2) RETURNING {}",
            INVOICE_COLUMNS
        );
        tracing::debug!(sql = %sql, params = ?new, "query");
        let row = sqlx::query_as::<_, Invoice>(&sql)
            .bind(&new.comp_code)
            .bind(new.amt)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_invoice(
        &self,
        id: i32,
        changes: &InvoiceChanges,
    ) -> Result<Option<Invoice>, AppError> {
        let sql = format!(
            "UPDATE invoices SET amt = $1 WHERE id = $2 RETURNING {}",
            INVOICE_COLUMNS
        );
        tracing::debug!(sql = %sql, id, params = ?changes, "query");
        let row = sqlx::query_as::<_, Invoice>(&sql)
            .bind(changes.amt)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_invoice(&self, id: i32) -> Result<u64, AppError> {
        let sql = "DELETE FROM invoices WHERE id = $1";
        tracing::debug!(sql = %sql, id, "query");
        let done = sqlx::query(sql).bind(id).execute(&self.pool).await?;
        Ok(done.rows_affected())
    }

    async fn create_industry(&self, new: &NewIndustry) -> Result<Industry, AppError> {
        let sql = "INSERT INTO industries (code, industry) VALUES ($1, $2) RETURNING code, industry";
        tracing::debug!(sql = %sql, params = ?new, "query");
        let row = sqlx::query_as::<_, Industry>(sql)
            .bind(&new.code)
            .bind(&new.industry)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn industry_company_rows(&self) -> Result<Vec<IndustryCompanyRow>, AppError> {
        let sql = "SELECT i.code, i.industry, ci.comp_code FROM industries i \
                   LEFT JOIN company_industries ci ON i.code = ci.industry_code \
                   ORDER BY i.code, ci.comp_code";
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, IndustryCompanyRow>(sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn associate(&self, link: &Association) -> Result<(), AppError> {
        let sql = "INSERT INTO company_industries (comp_code, industry_code) VALUES ($1, $2)";
        tracing::debug!(sql = %sql, params = ?link, "query");
        sqlx::query(sql)
            .bind(&link.comp_code)
            .bind(&link.industry_code)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
