use crate::error::{AgingReportError, Result};
use crate::schema::{ColumnRole, SemanticColumnMap};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single spreadsheet cell, as materialized by whatever read the source
/// artifact. Untagged so that JSON grids (`12.5`, `"text"`, `null`) load
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Text(String),
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Text(s) => f.write_str(s),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

/// An in-memory open-items table: ordered headers plus a row-major cell grid.
///
/// The engine performs no I/O; the caller materializes this from the source
/// workbook before invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Builds a dataset, rejecting rows whose width disagrees with the
    /// header row.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let expected = headers.len();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(AgingReportError::RaggedRow {
                    row,
                    found: cells.len(),
                    expected,
                });
            }
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// The first data row, used by the column resolver as a currency sample.
    pub fn sample_row(&self) -> Option<&[Cell]> {
        self.rows.first().map(|r| r.as_slice())
    }
}

/// Column indices for the six semantic roles, resolved once against a
/// concrete dataset before any row processing starts.
#[derive(Debug, Clone, Copy)]
pub struct RoleColumns {
    pub amount: usize,
    pub due_date: usize,
    pub assignment: usize,
    pub posting_date: usize,
    pub document_type: usize,
    pub currency: usize,
}

impl RoleColumns {
    /// Fails fast with [`AgingReportError::UnknownColumn`] if any mapped
    /// column is absent from the dataset headers.
    pub fn resolve(dataset: &Dataset, map: &SemanticColumnMap) -> Result<Self> {
        let lookup = |role: ColumnRole| -> Result<usize> {
            let column = map.column_for(role);
            dataset
                .column_index(column)
                .ok_or_else(|| AgingReportError::UnknownColumn {
                    role,
                    column: column.to_string(),
                })
        };

        Ok(Self {
            amount: lookup(ColumnRole::AmountLocalCurrency)?,
            due_date: lookup(ColumnRole::DueDate)?,
            assignment: lookup(ColumnRole::Assignment)?,
            posting_date: lookup(ColumnRole::PostingDate)?,
            document_type: lookup(ColumnRole::DocumentType)?,
            currency: lookup(ColumnRole::CurrencyColumn)?,
        })
    }
}

/// Role-based view over one dataset row.
#[derive(Debug, Clone, Copy)]
pub struct ItemView<'a> {
    cells: &'a [Cell],
    columns: &'a RoleColumns,
}

impl<'a> ItemView<'a> {
    pub fn new(cells: &'a [Cell], columns: &'a RoleColumns) -> Self {
        Self { cells, columns }
    }

    pub fn amount(&self) -> Option<f64> {
        self.cells[self.columns.amount].as_number()
    }

    pub fn due_date_cell(&self) -> &Cell {
        &self.cells[self.columns.due_date]
    }

    pub fn assignment_text(&self) -> Option<&str> {
        self.cells[self.columns.assignment].as_text()
    }

    pub fn has_posting_date(&self) -> bool {
        !self.cells[self.columns.posting_date].is_empty()
    }

    pub fn has_document_type(&self) -> bool {
        !self.cells[self.columns.document_type].is_empty()
    }
}
