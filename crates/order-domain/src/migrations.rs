// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Embedded schema migrations for the order domain.

use sqlx::migrate::MigrateError;
use sqlx::PgPool;

/// The embedded migrator for the order domain's tables.
pub static POSTGRES: sqlx::migrate::Migrator = sqlx::migrate!("./migrations/postgresql");

/// Run all pending migrations against `pool`.
pub async fn run_postgres(pool: &PgPool) -> Result<(), MigrateError> {
    POSTGRES.run(pool).await
}
