use crate::data::datavalue::DataValue;
use crate::data::record::{Record, RecordId};
use crate::view::columns::ColumnSet;

/// One cell: the raw value plus its formatted and case-folded text
#[derive(Debug, Clone, PartialEq)]
pub struct DataCell {
    pub value: DataValue,
    pub text: String,
    pub folded: String,
}

impl DataCell {
    pub fn new(value: DataValue, text: String) -> Self {
        let folded = text.to_lowercase();
        Self {
            value,
            text,
            folded,
        }
    }
}

/// A row of cells, one per column of the column set
#[derive(Debug, Clone)]
pub struct DataRow {
    pub id: RecordId,
    pub cells: Vec<DataCell>,
}

impl DataRow {
    pub fn get(&self, column: usize) -> Option<&DataCell> {
        self.cells.get(column)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Cell grid derived once from a record collection and its columns.
///
/// Records are immutable for the lifetime of a view, so every cell is read
/// and formatted exactly once; the pipeline stages only work on row indices
/// into this grid.
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    rows: Vec<DataRow>,
}

impl DataTable {
    pub fn from_records<R: Record>(records: &[R], columns: &ColumnSet) -> Self {
        let rows = records
            .iter()
            .map(|record| DataRow {
                id: record.id(),
                cells: columns
                    .iter()
                    .map(|column| {
                        let value = record.value(&column.key);
                        let text = column.format(&value);
                        DataCell::new(value, text)
                    })
                    .collect(),
            })
            .collect();

        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<&DataRow> {
        self.rows.get(index)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&DataCell> {
        self.rows.get(row)?.get(column)
    }

    pub fn row_id(&self, row: usize) -> Option<&RecordId> {
        self.rows.get(row).map(|r| &r.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::columns::{ColumnDescriptor, Formatter};
    use serde_json::json;

    #[test]
    fn test_cells_are_formatted_once() {
        let records = vec![
            json!({"id": 1, "name": "Leanne", "company": {"name": "Romaguera-Crona"}}),
            json!({"id": 2, "name": "Ervin"}),
        ];
        let columns = ColumnSet::new(vec![
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("company", "Company")
                .with_formatter(Formatter::Member("name".to_string())),
        ])
        .unwrap();

        let table = DataTable::from_records(&records, &columns);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.row_id(1), Some(&RecordId::Number(2)));
        let company = table.cell(0, 1).unwrap();
        assert_eq!(company.text, "Romaguera-Crona");
        assert_eq!(company.folded, "romaguera-crona");
        assert_eq!(table.cell(1, 1).unwrap().text, "");
        assert!(table.cell(2, 0).is_none());
    }
}
