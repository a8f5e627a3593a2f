//! Database setup for suites that run against embedded PostgreSQL.
//!
//! Databases are dropped and created over a plain `postgres` client so no
//! Diesel transaction wraps `DROP DATABASE`. The schema comes from the same
//! embedded migrations the server applies at startup.

use backend::outbound::persistence::run_pending_migrations;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};

/// Render a `postgres` error with its SQLSTATE, detail and hint.
///
/// The `Display` form of `postgres::Error` often reads just `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!("postgres error {:?}: {}", db_error.code(), db_error.message());
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(hint) = db_error.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }
    summary
}

/// Drop `name` if it exists and create it empty.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client = Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let quoted = name.replace('"', "\"\"");
    client
        .batch_execute(&format!(r#"DROP DATABASE IF EXISTS "{quoted}" WITH (FORCE)"#))
        .map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!(r#"CREATE DATABASE "{quoted}""#))
        .map_err(|err| format_postgres_error(&err))
}

/// Apply the server's migrations to `url`.
pub fn migrate_schema(runtime: &tokio::runtime::Runtime, url: &str) -> Result<(), String> {
    runtime
        .block_on(run_pending_migrations(url))
        .map_err(|err| err.to_string())
}
