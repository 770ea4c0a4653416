//! Database bootstrap: create the database if missing and the four tables if absent.

use crate::error::{AppError, ConfigError};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Table DDL in dependency order. Idempotent.
pub const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS companies (
        code TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS invoices (
        id SERIAL PRIMARY KEY,
        comp_code TEXT NOT NULL REFERENCES companies ON DELETE CASCADE,
        amt DOUBLE PRECISION NOT NULL,
        paid BOOLEAN DEFAULT false NOT NULL,
        add_date DATE DEFAULT CURRENT_DATE NOT NULL,
        paid_date DATE,
        CONSTRAINT invoices_amt_check CHECK (amt > 0)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS industries (
        code TEXT PRIMARY KEY,
        industry TEXT NOT NULL UNIQUE
    )"#,
    r#"CREATE TABLE IF NOT EXISTS company_industries (
        comp_code TEXT NOT NULL REFERENCES companies ON DELETE CASCADE,
        industry_code TEXT NOT NULL REFERENCES industries ON DELETE CASCADE,
        PRIMARY KEY (comp_code, industry_code)
    )"#,
];

pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    for ddl in SCHEMA {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(tables = SCHEMA.len(), "schema ensured");
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url).map_err(|e| {
        tracing::error!(error = %e, "unusable DATABASE_URL");
        invalid_url(database_url)
    })?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "database created");
    }
    Ok(())
}

fn invalid_url(url: &str) -> AppError {
    AppError::Config(ConfigError::Invalid {
        key: "DATABASE_URL",
        value: url.to_string(),
    })
}

/// Split `url` into the admin url (same server, `postgres` database) and the
/// target database name. A url without a path names no database.
fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let authority_start = url.find("://").ok_or_else(|| invalid_url(url))? + 3;
    let Some(slash) = url[authority_start..].find('/') else {
        let admin_url = match url.split_once('?') {
            Some((base, q)) => format!("{}/postgres?{}", base, q),
            None => format!("{}/postgres", url),
        };
        return Ok((admin_url, String::new()));
    };
    let path_start = authority_start + slash + 1;
    let path_and_query = &url[path_start..];
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((name, q)) => (name.trim(), Some(q)),
        None => (path_and_query.trim(), None),
    };
    let base = &url[..path_start];
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", base, q),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name_from_url() {
        let (admin, name) = parse_db_name_from_url("postgres://user:pw@localhost:5432/biztime").unwrap();
        assert_eq!(admin, "postgres://user:pw@localhost:5432/postgres");
        assert_eq!(name, "biztime");
    }

    #[test]
    fn keeps_query_string_on_admin_url() {
        let (admin, name) = parse_db_name_from_url("postgres://localhost/biztime_test?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres?sslmode=disable");
        assert_eq!(name, "biztime_test");
    }

    #[test]
    fn url_without_path_names_no_database() {
        let (admin, name) = parse_db_name_from_url("postgres://localhost").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres");
        assert_eq!(name, "");

        let (admin, name) = parse_db_name_from_url("postgres://user:pw@db:5432").unwrap();
        assert_eq!(admin, "postgres://user:pw@db:5432/postgres");
        assert_eq!(name, "");

        let (admin, _) = parse_db_name_from_url("postgres://localhost?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres?sslmode=disable");
    }

    #[test]
    fn url_without_scheme_is_a_config_error() {
        let err = parse_db_name_from_url("localhost/biztime").unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::Invalid { key: "DATABASE_URL", .. })
        ));
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("biz\"time"), "\"biz\"\"time\"");
    }

    #[test]
    fn schema_orders_parents_before_children() {
        let pos = |t: &str| {
            SCHEMA
                .iter()
                .position(|ddl| ddl.contains(&format!("EXISTS {} (", t)))
                .unwrap()
        };
        assert!(pos("companies") < pos("invoices"));
        assert!(pos("industries") < pos("company_industries"));
    }
}
