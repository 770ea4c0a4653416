//! Store contract against a real PostgreSQL.
//!
//! Runs only when `TEST_DATABASE_URL` is set, e.g.
//!
//! ```sh
//! TEST_DATABASE_URL=postgres://localhost/biztime_test cargo test --test postgres_tests
//! ```
//!
//! Each test works on its own codes so tests can share one database.

use biztime::models::{
    Association, CompanyChanges, InvoiceChanges, NewCompany, NewIndustry, NewInvoice,
};
use biztime::{ensure_database_exists, ensure_schema, AppError, PgStore, Store};
use sqlx::postgres::PgPoolOptions;

async fn pg_store() -> Option<PgStore> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set; skipping");
            return None;
        }
    };
    ensure_database_exists(&url).await.expect("create test database");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect to test database");
    ensure_schema(&pool).await.expect("apply schema");
    Some(PgStore::new(pool))
}

fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, std::process::id())
}

async fn company(store: &PgStore, code: &str) {
    store.delete_company(code).await.unwrap();
    store
        .create_company(&NewCompany {
            code: Some(code.into()),
            name: Some(format!("{} Inc", code)),
            description: Some("test".into()),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn company_lifecycle() {
    let Some(store) = pg_store().await else { return };
    let code = unique("lifecycle");
    company(&store, &code).await;

    let found = store.get_company(&code).await.unwrap().unwrap();
    assert_eq!(found.code, code);
    assert!(store.invoice_ids_for_company(&code).await.unwrap().is_empty());

    let updated = store
        .update_company(
            &code,
            &CompanyChanges {
                name: Some(format!("{} Renamed", code)),
                description: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.description, None);

    assert_eq!(store.delete_company(&code).await.unwrap(), 1);
    assert_eq!(store.delete_company(&code).await.unwrap(), 0);
    assert!(store.get_company(&code).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_company_is_unhandled() {
    let Some(store) = pg_store().await else { return };
    let code = unique("dup");
    company(&store, &code).await;
    let err = store
        .create_company(&NewCompany {
            code: Some(code.clone()),
            name: Some(format!("{} Other", code)),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Db(_)));
    store.delete_company(&code).await.unwrap();
}

#[tokio::test]
async fn invoice_constraints_surface_as_validation() {
    let Some(store) = pg_store().await else { return };
    let code = unique("inv");
    company(&store, &code).await;

    let missing_amt = store
        .create_invoice(&NewInvoice {
            comp_code: Some(code.clone()),
            amt: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(missing_amt, AppError::Validation(_)));

    let missing_company = store
        .create_invoice(&NewInvoice {
            comp_code: None,
            amt: Some(10.0),
        })
        .await
        .unwrap_err();
    assert!(matches!(missing_company, AppError::Validation(_)));

    let negative = store
        .create_invoice(&NewInvoice {
            comp_code: Some(code.clone()),
            amt: Some(-5.0),
        })
        .await
        .unwrap_err();
    assert!(matches!(negative, AppError::Validation(_)));

    let invoice = store
        .create_invoice(&NewInvoice {
            comp_code: Some(code.clone()),
            amt: Some(100.0),
        })
        .await
        .unwrap();
    assert!(!invoice.paid);
    assert_eq!(invoice.paid_date, None);
    assert_eq!(store.invoice_ids_for_company(&code).await.unwrap(), vec![invoice.id]);

    let updated = store
        .update_invoice(invoice.id, &InvoiceChanges { amt: Some(300.0) })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.amt, 300.0);
    assert!(store
        .update_invoice(-1, &InvoiceChanges { amt: Some(1.0) })
        .await
        .unwrap()
        .is_none());

    store.delete_company(&code).await.unwrap();
    assert!(store.get_invoice(invoice.id).await.unwrap().is_none());
}

#[tokio::test]
async fn industries_left_join_keeps_empty_industries() {
    let Some(store) = pg_store().await else { return };
    let comp = unique("ind_comp");
    let used = unique("ind_used");
    let empty = unique("ind_empty");
    company(&store, &comp).await;
    sqlx::query("DELETE FROM industries WHERE code = ANY($1)")
        .bind(vec![used.clone(), empty.clone()])
        .execute(store.pool())
        .await
        .unwrap();
    for code in [&used, &empty] {
        store
            .create_industry(&NewIndustry {
                code: Some(code.clone()),
                industry: Some(format!("{} name", code)),
            })
            .await
            .unwrap();
    }
    store
        .associate(&Association {
            comp_code: Some(comp.clone()),
            industry_code: Some(used.clone()),
        })
        .await
        .unwrap();

    let rows = store.industry_company_rows().await.unwrap();
    let used_rows: Vec<_> = rows.iter().filter(|r| r.code == used).collect();
    assert_eq!(used_rows.len(), 1);
    assert_eq!(used_rows[0].comp_code.as_deref(), Some(comp.as_str()));
    let empty_rows: Vec<_> = rows.iter().filter(|r| r.code == empty).collect();
    assert_eq!(empty_rows.len(), 1);
    assert_eq!(empty_rows[0].comp_code, None);

    assert_eq!(
        store.industry_names_for_company(&comp).await.unwrap(),
        vec![format!("{} name", used)]
    );

    store.delete_company(&comp).await.unwrap();
    sqlx::query("DELETE FROM industries WHERE code = ANY($1)")
        .bind(vec![used, empty])
        .execute(store.pool())
        .await
        .unwrap();
}
