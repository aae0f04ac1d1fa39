#![cfg(test)]
crate::reexport!(database);
crate::reexport!(context);
crate::reexport!(completion);
crate::reexport!(http);
pub use rstest::*;

pub(in crate::testing) fn common_init() {
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        // Only initialize once for all tests
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env()) // <- reads RUST_LOG
            .with_test_writer() // ensures it integrates with `cargo test` output
            .init();
    });
}

mod isolated_integration_tests {
    use super::{super::*, *};

    #[test_context(IsolatedIntegrationTest)]
    #[tokio::test]
    async fn can_connect(ctx: &mut IsolatedIntegrationTest) -> Result {
        sqlx::query("SELECT 1;").fetch_one(&ctx.pool).await?;
        Ok(())
    }

    #[test_context(IsolatedIntegrationTest)]
    #[rstest]
    #[case(1, "first_test")]
    #[case(1, "second_test")]
    #[tokio::test]
    async fn databases_are_isolated(
        ctx: &mut IsolatedIntegrationTest,
        #[case] id: i64,
        #[case] name: &str,
    ) -> Result {
        // Both cases create the same table; this only works if each gets a fresh database
        sqlx::query("CREATE TABLE test_table (id INTEGER PRIMARY KEY, name TEXT)")
            .execute(&ctx.pool)
            .await?;

        sqlx::query("INSERT INTO test_table (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(&ctx.pool)
            .await?;

        let actual_name: String = sqlx::query_scalar("SELECT name FROM test_table WHERE id = ?")
            .bind(id)
            .fetch_one(&ctx.pool)
            .await?;

        assert_eq!(name, actual_name);

        Ok(())
    }

    #[test_context(SeededIntegrationTest)]
    #[tokio::test]
    async fn seeded_database_has_sample_rows(ctx: &mut SeededIntegrationTest) -> Result {
        let customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Customers")
            .fetch_one(&ctx.pool)
            .await?;
        assert_eq!(customers, 2);
        Ok(())
    }
}
