//! Display-ready tables handed to the presentation layer.

use std::cmp::Ordering;
use std::fmt::Write;

use serde::Serialize;

use crate::error::{InsightError, InsightResult};

/// Value a row was grouped under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Empty,
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(value) => Some(*value as f64),
            Cell::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(value) => Some(*value),
            _ => None,
        }
    }

    fn compare(&self, other: &Cell) -> Ordering {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => match (self, other) {
                (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
                (Cell::Empty, Cell::Empty) => Ordering::Equal,
                (Cell::Empty, _) => Ordering::Greater,
                (_, Cell::Empty) => Ordering::Less,
                _ => Ordering::Equal,
            },
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Int(value) => write!(f, "{value}"),
            Cell::Float(value) => write!(f, "{value:.2}"),
            Cell::Text(value) => f.write_str(value),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<GroupKey> for Cell {
    fn from(key: GroupKey) -> Self {
        match key {
            GroupKey::Int(value) => Cell::Int(value),
            GroupKey::Text(value) => Cell::Text(value),
        }
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::Float).unwrap_or(Cell::Empty)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> InsightResult<usize> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| InsightError::UnknownColumn(name.to_string()))
    }

    pub fn column(&self, name: &str) -> InsightResult<Vec<&Cell>> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| &row[index]).collect())
    }

    #[cfg(test)]
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column).ok()?;
        self.rows.get(row).map(|row| &row[index])
    }

    /// Removes the named columns. Every name must exist.
    pub fn drop_columns(mut self, names: &[&str]) -> InsightResult<Self> {
        let mut indices = names
            .iter()
            .map(|name| self.column_index(name))
            .collect::<InsightResult<Vec<_>>>()?;
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();
        for index in indices {
            self.columns.remove(index);
            for row in self.rows.iter_mut() {
                row.remove(index);
            }
        }
        Ok(self)
    }

    /// Stable sort, so ties keep their current order.
    pub fn sort_by_column(&mut self, name: &str, descending: bool) -> InsightResult<()> {
        let index = self.column_index(name)?;
        self.rows.sort_by(|a, b| {
            let ordering = a[index].compare(&b[index]);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        Ok(())
    }

    pub fn retain_rows(
        &mut self,
        name: &str,
        mut keep: impl FnMut(&Cell) -> bool,
    ) -> InsightResult<()> {
        let index = self.column_index(name)?;
        self.rows.retain(|row| keep(&row[index]));
        Ok(())
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "| {} |", self.columns.join(" | "));
        let _ = writeln!(
            output,
            "|{}",
            self.columns.iter().map(|_| " --- |").collect::<String>()
        );
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
            let _ = writeln!(output, "| {} |", cells.join(" | "));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(["Name", "Count", "Rate"]);
        table.push_row(vec![Cell::Text("b".into()), Cell::Int(2), Cell::Float(0.5)]);
        table.push_row(vec![Cell::Text("a".into()), Cell::Int(5), Cell::Empty]);
        table.push_row(vec![Cell::Text("c".into()), Cell::Int(2), Cell::Float(1.5)]);
        table
    }

    #[test]
    fn sorts_descending_and_keeps_ties_stable() {
        let mut table = sample();
        table.sort_by_column("Count", true).unwrap();
        let names: Vec<_> = table.column("Name").unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_cells_sort_last() {
        let mut table = sample();
        table.sort_by_column("Rate", false).unwrap();
        assert_eq!(table.get(2, "Rate"), Some(&Cell::Empty));
    }

    #[test]
    fn drop_columns_requires_existing_names() {
        let table = sample().drop_columns(&["Rate"]).unwrap();
        assert_eq!(table.columns, vec!["Name", "Count"]);
        assert_eq!(table.rows[0].len(), 2);
        assert!(matches!(
            sample().drop_columns(&["Missing"]),
            Err(InsightError::UnknownColumn(_))
        ));
    }

    #[test]
    fn markdown_has_header_and_rows() {
        let markdown = sample().to_markdown();
        let lines: Vec<_> = markdown.lines().collect();
        assert_eq!(lines[0], "| Name | Count | Rate |");
        assert_eq!(lines[1], "| --- | --- | --- |");
        assert_eq!(lines[2], "| b | 2 | 0.50 |");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn serializes_cells_untagged() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["rows"][0][1], serde_json::json!(2));
        assert_eq!(json["rows"][1][2], serde_json::Value::Null);
    }
}
