//! Executable statements

use type_mapping::{PostgresValue, RowMode};

/// SQL text plus its positional parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    pub text: String,
    pub values: Vec<PostgresValue>,
    pub row_mode: RowMode,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            values: Vec::new(),
            row_mode: RowMode::Object,
        }
    }

    /// Append the next positional parameter
    pub fn bind(mut self, value: impl Into<PostgresValue>) -> Self {
        self.values.push(value.into());
        self
    }

    pub fn row_mode(mut self, row_mode: RowMode) -> Self {
        self.row_mode = row_mode;
        self
    }
}

impl From<&str> for Statement {
    fn from(text: &str) -> Self {
        Statement::new(text)
    }
}

impl From<String> for Statement {
    fn from(text: String) -> Self {
        Statement::new(text)
    }
}
