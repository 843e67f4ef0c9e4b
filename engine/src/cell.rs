//! The atomic unit of the spreadsheet: an Empty, Text, or Formula cell.
//!
//! A tagged sum rather than a polymorphic pointer, with a small
//! `get_value`/`get_text`/`get_referenced_cells` dispatch on the tag.

use parser::{CellValue, Formula, Position};

#[derive(Debug, Clone)]
pub enum Cell {
    Empty,
    /// Stores the raw text as-is (a leading apostrophe, if present, is
    /// retained here and stripped only in the visible value).
    Text(String),
    Formula {
        formula: Formula,
        /// Last evaluated value; kept in sync by the Sheet on every
        /// commit, never computed lazily.
        cached: CellValue,
    },
}

impl Cell {
    pub fn get_value(&self) -> CellValue {
        match self {
            Cell::Empty => CellValue::Number(0.0),
            Cell::Text(s) => CellValue::String(display_text(s)),
            Cell::Formula { cached, .. } => cached.clone(),
        }
    }

    /// The text the user would see if they edited this cell: empty for
    /// Empty, the raw stored string for Text, or `=<expression>` for a
    /// formula, reprinted in canonical minimally-parenthesized form.
    pub fn get_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Formula { formula, .. } => format!("={}", formula.get_expression()),
        }
    }

    pub fn get_referenced_cells(&self) -> &[Position] {
        match self {
            Cell::Empty | Cell::Text(_) => &[],
            Cell::Formula { formula, .. } => formula.get_referenced_cells(),
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, Cell::Formula { .. })
    }
}

fn display_text(s: &str) -> String {
    s.strip_prefix('\'').map(str::to_string).unwrap_or_else(|| s.to_string())
}
