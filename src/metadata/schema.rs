use super::*;
use std::fmt::{self, Display};

/// Every user table of the database with its columns, in a stable order.
///
/// Rendered one line per column (`Table <t>: column <c> (<type>)`), which is
/// the form embedded verbatim into prompts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaDescription {
    pub tables: Vec<Table>,
}

impl SchemaDescription {
    /// Group `(table, column, declared type)` triples into tables.
    ///
    /// Triples for one table are expected to be adjacent, which is how the
    /// catalog query orders them.
    pub fn from_entries<T, C, D>(entries: impl IntoIterator<Item = (T, C, D)>) -> Self
    where
        T: Into<String>,
        C: Into<String>,
        D: Into<String>,
    {
        let mut tables: Vec<Table> = Vec::new();
        for (table, column, data_type) in entries {
            let table = table.into();
            match tables.last_mut() {
                Some(last) if last.name == table => {}
                _ => tables.push(Table::new(table)),
            }
            if let Some(last) = tables.last_mut() {
                last.columns.push(Column::new(column, data_type));
            }
        }
        Self { tables }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Flattened `(table, column, declared type)` view.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.tables.iter().flat_map(|t| {
            t.columns
                .iter()
                .map(|c| (t.name.as_str(), c.name.as_str(), c.data_type.as_str()))
        })
    }
}

impl Display for SchemaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for table in &self.tables {
            for column in &table.columns {
                writeln!(f, "Table {}: {column}", table.name)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_adjacent_entries() {
        let schema = SchemaDescription::from_entries([
            ("Customers", "customer_id", "INTEGER"),
            ("Customers", "name", "TEXT"),
            ("Orders", "order_id", "INTEGER"),
        ]);
        assert_eq!(schema.tables.len(), 2);
        assert_eq!(
            schema.tables[0],
            Table::new_with_ordered("Customers", [("customer_id", "INTEGER"), ("name", "TEXT")])
        );
        assert_eq!(
            schema.table("Orders").and_then(|t| t.column("order_id")),
            Some(&Column::new("order_id", "INTEGER"))
        );
    }

    #[test]
    fn renders_one_line_per_column() {
        let schema = SchemaDescription::from_entries([
            ("Customers", "customer_id", "INTEGER"),
            ("Customers", "signup_date", "DATE"),
            ("Notes", "body", ""),
        ]);
        assert_eq!(
            schema.to_string(),
            "Table Customers: column customer_id (INTEGER)\n\
             Table Customers: column signup_date (DATE)\n\
             Table Notes: column body ()\n"
        );
    }

    #[test]
    fn empty_schema_renders_nothing() {
        let schema = SchemaDescription::from_entries(Vec::<(String, String, String)>::new());
        assert!(schema.is_empty());
        assert_eq!(schema.to_string(), "");
        assert_eq!(schema.entries().count(), 0);
    }
}
