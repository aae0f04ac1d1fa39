use super::*;
use crate::*;
use sqlx::Sqlite;

/// Every column of every user table, ordered by table name then column position.
const CATALOG_SQL: &str = r"
    SELECT m.name AS table_name, p.name AS column_name, p.type AS data_type
    FROM sqlite_master AS m
    JOIN pragma_table_info(m.name) AS p
    WHERE m.type = 'table' AND m.name NOT LIKE 'sqlite\_%' ESCAPE '\'
    ORDER BY m.name, p.cid";

/// Read the live catalog. Never cached, so a schema change is visible to the
/// very next question.
#[tracing::instrument(skip_all)]
pub async fn describe_schema<'c, E>(exec: E) -> Result<SchemaDescription>
where
    E: sqlx::Executor<'c, Database = Sqlite>,
{
    let entries: Vec<(String, String, String)> = sqlx::query_as(CATALOG_SQL)
        .fetch_all(exec)
        .await
        .map_err(Error::SchemaUnavailable)?;

    let schema = SchemaDescription::from_entries(entries);
    debug!(
        "Introspected {} tables ({} columns)",
        schema.tables.len(),
        schema.entries().count()
    );
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_context(IsolatedIntegrationTest)]
    #[tokio::test]
    async fn empty_database_has_no_tables(ctx: &mut IsolatedIntegrationTest) -> Result {
        let schema = describe_schema(&ctx.pool).await?;
        assert!(schema.is_empty());
        Ok(())
    }

    #[test_context(IsolatedIntegrationTest)]
    #[tokio::test]
    async fn tables_sorted_and_columns_in_declaration_order(
        ctx: &mut IsolatedIntegrationTest,
    ) -> Result {
        sqlx::raw_sql(
            "CREATE TABLE Orders (order_id INTEGER PRIMARY KEY, customer_id INTEGER, order_date DATETIME, status TEXT);
             CREATE TABLE Customers (customer_id INTEGER PRIMARY KEY, name TEXT NOT NULL, email TEXT UNIQUE, city TEXT, signup_date DATE);",
        )
        .execute(&ctx.pool)
        .await?;

        let schema = describe_schema(&ctx.pool).await?;
        let names = schema.tables.iter().map(|t| t.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Customers", "Orders"]);

        let customers = schema.table("Customers").expect("Customers table");
        let columns = customers
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.data_type.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            columns,
            [
                ("customer_id", "INTEGER"),
                ("name", "TEXT"),
                ("email", "TEXT"),
                ("city", "TEXT"),
                ("signup_date", "DATE"),
            ]
        );
        Ok(())
    }

    #[test_context(SeededIntegrationTest)]
    #[tokio::test]
    async fn repeated_calls_are_identical(ctx: &mut SeededIntegrationTest) -> Result {
        let first = describe_schema(&ctx.pool).await?.to_string();
        let second = describe_schema(&ctx.pool).await?.to_string();
        assert!(!first.is_empty());
        assert_eq!(first, second);
        Ok(())
    }

    #[test_context(IsolatedIntegrationTest)]
    #[tokio::test]
    async fn internal_tables_are_hidden(ctx: &mut IsolatedIntegrationTest) -> Result {
        // AUTOINCREMENT makes the engine create sqlite_sequence.
        sqlx::raw_sql(
            "CREATE TABLE Notes (id INTEGER PRIMARY KEY AUTOINCREMENT, body);
             INSERT INTO Notes (body) VALUES ('hello');",
        )
        .execute(&ctx.pool)
        .await?;

        let schema = describe_schema(&ctx.pool).await?;
        assert_eq!(
            schema.to_string(),
            "Table Notes: column id (INTEGER)\nTable Notes: column body ()\n"
        );
        Ok(())
    }

    #[test_context(IsolatedIntegrationTest)]
    #[tokio::test]
    async fn schema_changes_are_seen_immediately(ctx: &mut IsolatedIntegrationTest) -> Result {
        sqlx::raw_sql("CREATE TABLE Products (product_id INTEGER PRIMARY KEY, name TEXT)")
            .execute(&ctx.pool)
            .await?;
        let before = describe_schema(&ctx.pool).await?;

        sqlx::raw_sql("ALTER TABLE Products ADD COLUMN price REAL")
            .execute(&ctx.pool)
            .await?;
        let after = describe_schema(&ctx.pool).await?;

        assert_ne!(before, after);
        assert_eq!(
            after.table("Products").and_then(|t| t.column("price")),
            Some(&Column::new("price", "REAL"))
        );
        Ok(())
    }
}
