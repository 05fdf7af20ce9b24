//! Tabular data, read-only or editable cell by cell.

use crate::dispatch::Component;
use crate::props::{Props, display_text};
use crate::widget::{Interaction, Reaction};
use serde_json::{Value, json};

/// Column headers plus rows of cells. Object rows are laid out by column name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    fn decode(props: &Props<'_>) -> Self {
        let columns = props.string_list("columns");
        let rows = props
            .array("rows")
            .iter()
            .filter_map(|row| match row {
                Value::Array(cells) => Some(cells.clone()),
                Value::Object(fields) => Some(
                    columns
                        .iter()
                        .map(|column| fields.get(column).cloned().unwrap_or(Value::Null))
                        .collect(),
                ),
                _ => None,
            })
            .collect();
        Self { columns, rows }
    }

    /// Cells per row: the header count, or the row's own length without headers.
    pub fn width(&self, row: usize) -> usize {
        if self.columns.is_empty() {
            self.rows.get(row).map_or(0, Vec::len)
        } else {
            self.columns.len()
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows.len() && col < self.width(row)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    pub fn cell_text(&self, row: usize, col: usize) -> String {
        self.cell(row, col).map(display_text).unwrap_or_default()
    }

    fn describe(&self) -> String {
        if self.columns.is_empty() {
            format!("{} rows", self.rows.len())
        } else {
            format!("{} x {} rows", self.columns.join(", "), self.rows.len())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    pub table: Table,
}

impl Component for DataTable {
    const TAG: &'static str = "DataTable";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            table: Table::decode(props),
        }
    }

    fn describe(&self) -> String {
        self.table.describe()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataEditor {
    pub table: Table,
}

impl Component for DataEditor {
    const TAG: &'static str = "DataEditor";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            table: Table::decode(props),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        match interaction {
            Interaction::EditCell { row, col, value } if self.table.contains(row, col) => {
                Reaction::emit_value("change", json!({"row": row, "col": col, "value": value}))
            }
            Interaction::EditCell { .. } => Reaction::Ignored,
            _ => Reaction::Unsupported,
        }
    }

    fn describe(&self) -> String {
        format!("{} (editable)", self.table.describe())
    }
}
