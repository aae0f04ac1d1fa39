#[derive(Clone, Debug, PartialEq, Eq, derive_more::Display)]
#[display("column {name} ({data_type})")]
pub struct Column {
    pub name: String,
    /// Declared type exactly as written in the table definition, possibly empty.
    pub data_type: String,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}
