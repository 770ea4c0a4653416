//! Row types and request payloads for companies, invoices and industries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// Company with its derived invoice ids and industry names.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub invoices: Vec<i32>,
    pub industries: Vec<String>,
}

/// POST /companies body. Fields stay optional so missing values reach the
/// NOT NULL constraints instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCompany {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// PUT /companies/:code body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: i32,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewInvoice {
    pub comp_code: Option<String>,
    pub amt: Option<f64>,
}

/// PUT /invoices/:id body; only the amount is mutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceChanges {
    pub amt: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Industry {
    pub code: String,
    pub industry: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewIndustry {
    pub code: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Association {
    pub comp_code: Option<String>,
    pub industry_code: Option<String>,
}

/// One row of `industries LEFT JOIN company_industries`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct IndustryCompanyRow {
    pub code: String,
    pub industry: String,
    pub comp_code: Option<String>,
}

/// An industry with the codes of its associated companies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryListing {
    pub industry: String,
    pub companies: Vec<String>,
}
