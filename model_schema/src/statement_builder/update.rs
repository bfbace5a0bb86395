use super::fragment::cast_placeholder;
use super::{target_table, StatementBuilder, UpdateOptions, WriteKind};
use crate::column::ColumnType;
use crate::errors::BuildError;
use crate::model::ModelDescriptor;
use crate::record::{DataRecord, FieldValue};
use crate::statement::Statement;
use crate::validation::ValidatedColumnName;
use type_mapping::RowMode;

impl StatementBuilder {
    /// Build `UPDATE <table> SET <col = fragment, ...> WHERE <id> = $<last>`.
    ///
    /// The id value is taken from the record and always bound last.
    pub fn build_update(
        &self,
        model: &ModelDescriptor,
        data: &DataRecord,
        options: &UpdateOptions,
    ) -> Result<Statement, BuildError> {
        let table = target_table(model, options.table_name.as_deref())?;
        let id_column = ValidatedColumnName::new(&options.id_column)?;

        let mut values = Vec::new();
        let fragments = self.column_fragments(table, model, data, WriteKind::Update, &mut values)?;
        if fragments.is_empty() {
            return Err(BuildError::NothingToUpdate {
                table: table.to_string(),
            });
        }

        let id = match data.get(id_column.as_str()) {
            Some(FieldValue::Scalar(id)) if !id.is_null() => id.clone(),
            Some(other) if !other.is_null() => {
                return Err(BuildError::mismatch(
                    table,
                    id_column.as_str(),
                    ColumnType::Scalar,
                    other.kind(),
                ))
            }
            _ => {
                return Err(BuildError::MissingId {
                    table: table.to_string(),
                    column: id_column.to_string(),
                })
            }
        };

        let assignments = fragments
            .iter()
            .map(|fragment| format!("{} = {}", fragment.column, fragment.sql))
            .collect::<Vec<_>>()
            .join(", ");
        let id_placeholder = match model.get(id_column.as_str()) {
            Some(spec) => cast_placeholder(spec, &id, values.len() + 1),
            None => id.placeholder(values.len() + 1),
        };
        values.push(id);

        let text = format!(
            "UPDATE {} SET {} WHERE {} = {}",
            table, assignments, id_column, id_placeholder
        );

        Ok(Statement {
            text,
            values,
            row_mode: RowMode::Array,
        })
    }
}
