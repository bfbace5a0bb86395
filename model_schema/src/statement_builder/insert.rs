use super::{target_table, InsertOptions, StatementBuilder, WriteKind};
use crate::errors::BuildError;
use crate::model::ModelDescriptor;
use crate::record::DataRecord;
use crate::statement::Statement;
use crate::validation::ValidatedColumnName;
use type_mapping::RowMode;

impl StatementBuilder {
    /// Build `INSERT INTO <table> (<columns>) VALUES (<fragments>) [RETURNING <id>]`
    pub fn build_insert(
        &self,
        model: &ModelDescriptor,
        data: &DataRecord,
        options: &InsertOptions,
    ) -> Result<Statement, BuildError> {
        let table = target_table(model, options.table_name.as_deref())?;
        let mut values = Vec::new();
        let fragments = self.column_fragments(table, model, data, WriteKind::Insert, &mut values)?;

        let mut text = if fragments.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", table)
        } else {
            let (columns, sql): (Vec<&str>, Vec<String>) = fragments
                .into_iter()
                .map(|fragment| (fragment.column, fragment.sql))
                .unzip();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                columns.join(", "),
                sql.join(", ")
            )
        };

        if options.return_id {
            let id_column = ValidatedColumnName::new(&options.id_column)?;
            text.push_str(" RETURNING ");
            text.push_str(id_column.as_str());
        }

        Ok(Statement {
            text,
            values,
            row_mode: RowMode::Array,
        })
    }
}
