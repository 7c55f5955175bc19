// src/data_input/export_data.rs

/// Tabular dataset read from an instrument export.
///
/// Cells are kept as the raw (trimmed) text from the file. Numeric access goes
/// through [`DataTable::numeric_column`], which coerces each cell to
/// `Option<f64>` so unparseable or NaN cells are explicit `None`s.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DataTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    metadata: Vec<(String, String)>, // Key-value pairs found before the first section.
}

impl DataTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Builds a table from string slices. Short rows are padded with empty cells.
    pub fn from_rows(headers: &[&str], rows: &[Vec<&str>]) -> Self {
        let mut table = Self::new(headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            table.push_row(row.iter().map(|c| c.to_string()).collect());
        }
        table
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn metadata(&self) -> &[(String, String)] {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: Vec<(String, String)>) {
        self.metadata = metadata;
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Returns the subset of `names` that are not columns of this table, in the given order.
    pub fn missing_columns<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        names
            .iter()
            .copied()
            .filter(|name| !self.has_column(name))
            .collect()
    }

    /// Appends a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Appends a column filled by `value(row_index)`.
    pub fn push_column<F>(&mut self, name: &str, mut value: F)
    where
        F: FnMut(usize) -> String,
    {
        self.headers.push(name.to_string());
        for (row_index, row) in self.rows.iter_mut().enumerate() {
            row.push(value(row_index));
        }
    }

    /// Appends every row of `other`, merging columns by name.
    /// Columns not yet present are added (first-seen order); absent cells stay empty.
    pub fn append(&mut self, other: DataTable) {
        let mut mapping = Vec::with_capacity(other.headers.len());
        for header in &other.headers {
            let index = match self.column_index(header) {
                Some(index) => index,
                None => {
                    self.headers.push(header.clone());
                    for row in &mut self.rows {
                        row.push(String::new());
                    }
                    self.headers.len() - 1
                }
            };
            mapping.push(index);
        }

        let width = self.headers.len();
        for source_row in other.rows {
            let mut row = vec![String::new(); width];
            for (cell, &target) in source_row.into_iter().zip(mapping.iter()) {
                row[target] = cell;
            }
            self.rows.push(row);
        }
    }

    /// Raw text of a column, or `None` when the column does not exist.
    pub fn text_column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Column coerced to numbers, or `None` when the column does not exist.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| coerce_numeric(&row[index])).collect())
    }
}

/// Coerces one cell to a number. Empty, unparseable and NaN cells become `None`.
pub fn coerce_numeric(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce_numeric(" 12.5 "), Some(12.5));
        assert_eq!(coerce_numeric("1e-3"), Some(0.001));
        assert_eq!(coerce_numeric(""), None);
        assert_eq!(coerce_numeric("Pa.s"), None);
        assert_eq!(coerce_numeric("NaN"), None);
    }

    #[test]
    fn test_append_merges_columns_by_name() {
        let mut first = DataTable::from_rows(&["a", "b"], &[vec!["1", "2"]]);
        let second = DataTable::from_rows(&["b", "c"], &[vec!["3", "4"]]);
        first.append(second);

        assert_eq!(first.headers(), &["a", "b", "c"]);
        assert_eq!(first.text_column("a"), Some(vec!["1", ""]));
        assert_eq!(first.text_column("b"), Some(vec!["2", "3"]));
        assert_eq!(first.text_column("c"), Some(vec!["", "4"]));
    }

    #[test]
    fn test_missing_columns_keeps_requested_order() {
        let table = DataTable::from_rows(&["Viscosity"], &[]);
        assert_eq!(
            table.missing_columns(&["Viscosity", "peak", "Step time"]),
            vec!["peak", "Step time"]
        );
    }

    #[test]
    fn test_push_column_and_short_rows() {
        let mut table = DataTable::from_rows(&["x", "y"], &[vec!["1"], vec!["2", "3"]]);
        table.push_column("t", |i| format!("{}", i * 10));
        assert_eq!(table.numeric_column("y"), Some(vec![None, Some(3.0)]));
        assert_eq!(table.text_column("t"), Some(vec!["0", "10"]));
        assert!(table.numeric_column("missing").is_none());
    }
}
