//! In-memory store that enforces the same constraints as the PostgreSQL schema:
//! primary and unique keys, foreign keys with cascading deletes, NOT NULL
//! columns, the positive amount check and column defaults.

use super::Store;
use crate::error::AppError;
use crate::models::{
    Association, Company, CompanyChanges, Industry, IndustryCompanyRow, Invoice, InvoiceChanges,
    NewCompany, NewIndustry, NewInvoice,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    companies: BTreeMap<String, Company>,
    invoices: BTreeMap<i32, Invoice>,
    industries: BTreeMap<String, Industry>,
    /// (industry_code, comp_code), ordered the way the listing query orders.
    company_industries: BTreeSet<(String, String)>,
    last_invoice_id: i32,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|e| AppError::Unhandled(format!("failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|e| AppError::Unhandled(format!("failed to acquire write lock: {}", e)))
    }
}

fn not_null<'a, T>(value: &'a Option<T>, column: &str, relation: &str) -> Result<&'a T, AppError> {
    value.as_ref().ok_or_else(|| {
        AppError::Validation(format!(
            "null value in column \"{}\" of relation \"{}\" violates not-null constraint",
            column, relation
        ))
    })
}

fn positive_amount(amt: f64) -> Result<f64, AppError> {
    if amt > 0.0 {
        Ok(amt)
    } else {
        Err(AppError::Validation(
            "new row for relation \"invoices\" violates check constraint \"invoices_amt_check\"".into(),
        ))
    }
}

fn duplicate_key(constraint: &str) -> AppError {
    AppError::Unhandled(format!(
        "duplicate key value violates unique constraint \"{}\"",
        constraint
    ))
}

fn missing_reference(relation: &str, constraint: &str) -> AppError {
    AppError::Unhandled(format!(
        "insert or update on table \"{}\" violates foreign key constraint \"{}\"",
        relation, constraint
    ))
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        Ok(self.read()?.companies.values().cloned().collect())
    }

    async fn get_company(&self, code: &str) -> Result<Option<Company>, AppError> {
        Ok(self.read()?.companies.get(code).cloned())
    }

    async fn invoice_ids_for_company(&self, code: &str) -> Result<Vec<i32>, AppError> {
        Ok(self
            .read()?
            .invoices
            .values()
            .filter(|inv| inv.comp_code == code)
            .map(|inv| inv.id)
            .collect())
    }

    async fn industry_names_for_company(&self, code: &str) -> Result<Vec<String>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .company_industries
            .iter()
            .filter(|(_, comp)| comp == code)
            .filter_map(|(ind, _)| tables.industries.get(ind))
            .map(|ind| ind.industry.clone())
            .collect())
    }

    async fn create_company(&self, new: &NewCompany) -> Result<Company, AppError> {
        let code = not_null(&new.code, "code", "companies")?;
        let name = not_null(&new.name, "name", "companies")?;
        let mut tables = self.write()?;
        if tables.companies.contains_key(code) {
            return Err(duplicate_key("companies_pkey"));
        }
        if tables.companies.values().any(|c| &c.name == name) {
            return Err(duplicate_key("companies_name_key"));
        }
        let company = Company {
            code: code.clone(),
            name: name.clone(),
            description: new.description.clone(),
        };
        tables.companies.insert(code.clone(), company.clone());
        Ok(company)
    }

    async fn update_company(
        &self,
        code: &str,
        changes: &CompanyChanges,
    ) -> Result<Option<Company>, AppError> {
        let mut tables = self.write()?;
        if !tables.companies.contains_key(code) {
            return Ok(None);
        }
        let name = not_null(&changes.name, "name", "companies")?;
        if tables.companies.values().any(|c| c.code != code && &c.name == name) {
            return Err(duplicate_key("companies_name_key"));
        }
        let updated = tables.companies.get_mut(code).map(|company| {
            company.name = name.clone();
            company.description = changes.description.clone();
            company.clone()
        });
        Ok(updated)
    }

    async fn delete_company(&self, code: &str) -> Result<u64, AppError> {
        let mut tables = self.write()?;
        if tables.companies.remove(code).is_none() {
            return Ok(0);
        }
        tables.invoices.retain(|_, inv| inv.comp_code != code);
        tables.company_industries.retain(|(_, comp)| comp != code);
        Ok(1)
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        Ok(self.read()?.invoices.values().cloned().collect())
    }

    async fn get_invoice(&self, id: i32) -> Result<Option<Invoice>, AppError> {
        Ok(self.read()?.invoices.get(&id).cloned())
    }

    async fn create_invoice(&self, new: &NewInvoice) -> Result<Invoice, AppError> {
        let comp_code = not_null(&new.comp_code, "comp_code", "invoices")?;
        let amt = positive_amount(*not_null(&new.amt, "amt", "invoices")?)?;
        let mut tables = self.write()?;
        if !tables.companies.contains_key(comp_code) {
            return Err(missing_reference("invoices", "invoices_comp_code_fkey"));
        }
        tables.last_invoice_id += 1;
        let invoice = Invoice {
            id: tables.last_invoice_id,
            comp_code: comp_code.clone(),
            amt,
            paid: false,
            add_date: chrono::Local::now().date_naive(),
            paid_date: None,
        };
        tables.invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn update_invoice(
        &self,
        id: i32,
        changes: &InvoiceChanges,
    ) -> Result<Option<Invoice>, AppError> {
        let mut tables = self.write()?;
        let Some(invoice) = tables.invoices.get_mut(&id) else {
            return Ok(None);
        };
        invoice.amt = positive_amount(*not_null(&changes.amt, "amt", "invoices")?)?;
        Ok(Some(invoice.clone()))
    }

    async fn delete_invoice(&self, id: i32) -> Result<u64, AppError> {
        Ok(self.write()?.invoices.remove(&id).map_or(0, |_| 1))
    }

    async fn create_industry(&self, new: &NewIndustry) -> Result<Industry, AppError> {
        let code = not_null(&new.code, "code", "industries")?;
        let name = not_null(&new.industry, "industry", "industries")?;
        let mut tables = self.write()?;
        if tables.industries.contains_key(code) {
            return Err(duplicate_key("industries_pkey"));
        }
        if tables.industries.values().any(|i| &i.industry == name) {
            return Err(duplicate_key("industries_industry_key"));
        }
        let industry = Industry {
            code: code.clone(),
            industry: name.clone(),
        };
        tables.industries.insert(code.clone(), industry.clone());
        Ok(industry)
    }

    async fn industry_company_rows(&self) -> Result<Vec<IndustryCompanyRow>, AppError> {
        let tables = self.read()?;
        let mut rows = Vec::new();
        for ind in tables.industries.values() {
            let before = rows.len();
            rows.extend(
                tables
                    .company_industries
                    .iter()
                    .filter(|(ind_code, _)| ind_code == &ind.code)
                    .map(|(_, comp)| IndustryCompanyRow {
                        code: ind.code.clone(),
                        industry: ind.industry.clone(),
                        comp_code: Some(comp.clone()),
                    }),
            );
            if rows.len() == before {
                rows.push(IndustryCompanyRow {
                    code: ind.code.clone(),
                    industry: ind.industry.clone(),
                    comp_code: None,
                });
            }
        }
        Ok(rows)
    }

    async fn associate(&self, link: &Association) -> Result<(), AppError> {
        let comp_code = not_null(&link.comp_code, "comp_code", "company_industries")?;
        let industry_code = not_null(&link.industry_code, "industry_code", "company_industries")?;
        let mut tables = self.write()?;
        if !tables.companies.contains_key(comp_code) {
            return Err(missing_reference(
                "company_industries",
                "company_industries_comp_code_fkey",
            ));
        }
        if !tables.industries.contains_key(industry_code) {
            return Err(missing_reference(
                "company_industries",
                "company_industries_industry_code_fkey",
            ));
        }
        if !tables
            .company_industries
            .insert((industry_code.clone(), comp_code.clone()))
        {
            return Err(duplicate_key("company_industries_pkey"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(code: &str, name: &str) -> NewCompany {
        NewCompany {
            code: Some(code.into()),
            name: Some(name.into()),
            description: None,
        }
    }

    #[tokio::test]
    async fn invoice_ids_are_never_reused() {
        let store = MemoryStore::new();
        store.create_company(&company("goog", "Google")).await.unwrap();
        let new = NewInvoice {
            comp_code: Some("goog".into()),
            amt: Some(100.0),
        };
        let first = store.create_invoice(&new).await.unwrap();
        assert_eq!(store.delete_invoice(first.id).await.unwrap(), 1);
        let second = store.create_invoice(&new).await.unwrap();
        assert!(second.id > first.id);
        assert!(!second.paid);
        assert_eq!(second.paid_date, None);
    }

    #[tokio::test]
    async fn deleting_a_company_cascades() {
        let store = MemoryStore::new();
        store.create_company(&company("goog", "Google")).await.unwrap();
        store
            .create_industry(&NewIndustry {
                code: Some("tech".into()),
                industry: Some("Technology".into()),
            })
            .await
            .unwrap();
        store
            .associate(&Association {
                comp_code: Some("goog".into()),
                industry_code: Some("tech".into()),
            })
            .await
            .unwrap();
        store
            .create_invoice(&NewInvoice {
                comp_code: Some("goog".into()),
                amt: Some(50.0),
            })
            .await
            .unwrap();

        assert_eq!(store.delete_company("goog").await.unwrap(), 1);
        assert!(store.list_invoices().await.unwrap().is_empty());
        let rows = store.industry_company_rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].comp_code, None);
        assert_eq!(store.delete_company("goog").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn constraint_violations_are_classified() {
        let store = MemoryStore::new();
        store.create_company(&company("goog", "Google")).await.unwrap();

        let dup = store.create_company(&company("goog", "Other")).await.unwrap_err();
        assert!(matches!(dup, AppError::Unhandled(_)));

        let missing = store
            .create_invoice(&NewInvoice {
                comp_code: None,
                amt: Some(10.0),
            })
            .await
            .unwrap_err();
        assert!(matches!(missing, AppError::Validation(_)));

        let negative = store
            .create_invoice(&NewInvoice {
                comp_code: Some("goog".into()),
                amt: Some(-1.0),
            })
            .await
            .unwrap_err();
        assert!(matches!(negative, AppError::Validation(_)));

        let dangling = store
            .create_invoice(&NewInvoice {
                comp_code: Some("nope".into()),
                amt: Some(10.0),
            })
            .await
            .unwrap_err();
        assert!(matches!(dangling, AppError::Unhandled(_)));
    }

    #[tokio::test]
    async fn updating_a_missing_invoice_matches_nothing() {
        let store = MemoryStore::new();
        let changes = InvoiceChanges { amt: None };
        assert_eq!(store.update_invoice(7, &changes).await.unwrap(), None);
        assert!(store.list_invoices().await.unwrap().is_empty());
    }
}
