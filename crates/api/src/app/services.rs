//! Infrastructure wiring for the API process.

use cinedex_infra::{DatabaseError, Settings, SqlGateway};

/// Open the connection pool described by `settings`.
pub async fn build_gateway(settings: &Settings) -> Result<SqlGateway, DatabaseError> {
    let driver = settings
        .database_url
        .split(':')
        .next()
        .unwrap_or_default();
    tracing::info!(driver, max_connections = settings.max_connections, "connecting to database");

    SqlGateway::connect(&settings.database_url, settings.max_connections).await
}
