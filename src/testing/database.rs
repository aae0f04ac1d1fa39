use crate::*;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::{str::FromStr as _, time::Instant};

/// A fresh private in-memory database.
///
/// Every `sqlite::memory:` connect string names a new shared-cache database,
/// so pools never see each other's tables. The database lives as long as the
/// pool keeps its single connection open.
pub async fn pool() -> SqlitePool {
    let startup = Instant::now();
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("in-memory connect string")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect_with(options)
        .await
        .expect("db init connection failure");
    debug!("In-memory database ready in {:#.2?}", startup.elapsed());
    pool
}
