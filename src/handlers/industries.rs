//! Industry handlers: create, list with associated companies, associate.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::models::{Association, IndustryCompanyRow, IndustryListing, NewIndustry};
use crate::response::{created, ok, status};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};
use indexmap::IndexMap;

/// Group join rows by industry code, keeping first-seen order. Rows with no
/// company contribute the industry but no company code.
pub fn group_by_industry(rows: Vec<IndustryCompanyRow>) -> Vec<IndustryListing> {
    rows.into_iter()
        .fold(
            IndexMap::<String, IndustryListing>::new(),
            |mut acc, row| {
                let entry = acc.entry(row.code).or_insert_with(|| IndustryListing {
                    industry: row.industry,
                    companies: Vec::new(),
                });
                if let Some(comp_code) = row.comp_code {
                    entry.companies.push(comp_code);
                }
                acc
            },
        )
        .into_values()
        .collect()
}

/// POST /industries
pub async fn create_industry(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewIndustry>,
) -> Result<impl IntoResponse, AppError> {
    let industry = state.store.create_industry(&body).await?;
    tracing::info!(code = %industry.code, "industry created");
    Ok(created("industry", industry))
}

/// GET /industries
pub async fn list_industries(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows = state.store.industry_company_rows().await?;
    Ok(ok("industries", group_by_industry(rows)))
}

/// POST /industries/associate
pub async fn associate_industry(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Association>,
) -> Result<impl IntoResponse, AppError> {
    state.store.associate(&body).await?;
    Ok(status("Associated!"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, industry: &str, comp: Option<&str>) -> IndustryCompanyRow {
        IndustryCompanyRow {
            code: code.into(),
            industry: industry.into(),
            comp_code: comp.map(Into::into),
        }
    }

    #[test]
    fn groups_companies_under_their_industry() {
        let grouped = group_by_industry(vec![
            row("acct", "Accounting", None),
            row("tech", "Technology", Some("apple")),
            row("tech", "Technology", Some("goog")),
        ]);
        assert_eq!(
            grouped,
            vec![
                IndustryListing {
                    industry: "Accounting".into(),
                    companies: vec![],
                },
                IndustryListing {
                    industry: "Technology".into(),
                    companies: vec!["apple".into(), "goog".into()],
                },
            ]
        );
    }

    #[test]
    fn keeps_first_seen_order_for_interleaved_rows() {
        let grouped = group_by_industry(vec![
            row("tech", "Technology", Some("goog")),
            row("acct", "Accounting", Some("ibm")),
            row("tech", "Technology", Some("apple")),
        ]);
        let names: Vec<&str> = grouped.iter().map(|l| l.industry.as_str()).collect();
        assert_eq!(names, ["Technology", "Accounting"]);
        assert_eq!(grouped[0].companies, ["goog", "apple"]);
    }

    #[test]
    fn empty_result_yields_no_industries() {
        assert!(group_by_industry(Vec::new()).is_empty());
    }
}
