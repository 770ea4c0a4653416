//! BizTime server: loads settings, connects the store, serves the API.

use biztime::{
    build_app, ensure_database_exists, ensure_schema, AppState, MemoryStore, PgStore, Settings,
    StoreKind,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("biztime=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let state = match settings.store {
        StoreKind::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&settings.database_url)
                .await?;
            if settings.ensure_schema {
                ensure_schema(&pool).await?;
            }
            AppState::new(PgStore::new(pool))
        }
        StoreKind::Memory => {
            tracing::warn!("running on the in-memory store; data is lost on exit");
            AppState::new(MemoryStore::new())
        }
    };

    let app = build_app(state);
    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
