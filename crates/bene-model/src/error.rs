use thiserror::Error;

/// An expected column is absent from a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("column '{column}' not found in {table} table")]
    MissingColumn { table: String, column: String },
}

impl SchemaError {
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// The column the error refers to.
    pub fn column(&self) -> &str {
        match self {
            Self::MissingColumn { column, .. } => column,
        }
    }
}

/// The data violates an invariant the pipeline relies on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataIntegrityError {
    /// A lookup table holds the same key more than once, so a left join
    /// would silently duplicate rows.
    #[error(
        "join key '{column}' is not unique in {table} table: value '{value}' appears {count} times"
    )]
    DuplicateKey {
        table: String,
        column: String,
        value: String,
        count: usize,
    },
}
