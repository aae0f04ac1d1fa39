use crate::testing::*;
use crate::*;
use sqlx::SqlitePool;
use test_context::AsyncTestContext;
pub use test_context::test_context;

/// An empty database of its own for each test.
pub struct IsolatedIntegrationTest {
    pub pool: SqlitePool,
}

impl AsyncTestContext for IsolatedIntegrationTest {
    async fn setup() -> Self {
        crate::testing::common_init();
        Self { pool: pool().await }
    }

    async fn teardown(self) {
        self.pool.close().await;
    }
}

/// Like [`IsolatedIntegrationTest`], with the sample e-commerce data loaded.
pub struct SeededIntegrationTest {
    pub pool: SqlitePool,
}

impl SeededIntegrationTest {
    pub async fn new() -> Self {
        crate::testing::common_init();
        let pool = pool().await;
        seed(&pool).await.expect("Failed to seed test database");
        Self { pool }
    }
}

impl AsyncTestContext for SeededIntegrationTest {
    async fn setup() -> Self {
        Self::new().await
    }

    async fn teardown(self) {
        self.pool.close().await;
    }
}
