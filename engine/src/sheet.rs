//! The Sheet: a sparse grid of Cells plus the dependency graph that keeps
//! their cached formula values consistent, with a fully transactional
//! `set_cell`.

use std::collections::{HashMap, HashSet};

use parser::{CellValue, Formula, Position, SheetView, Size};

use crate::cell::Cell;
use crate::dependency_graph::DependencyGraph;
use crate::error::{CircularDependencyError, FormulaException, InvalidPositionError, SetCellError};

#[derive(Debug, Default)]
pub struct Sheet {
    cells: HashMap<Position, Cell>,
    graph: DependencyGraph,
    max_row: i32,
    max_col: i32,
}

impl Sheet {
    pub fn new() -> Self {
        Sheet::default()
    }

    pub fn get_cell(&self, pos: Position) -> Result<Option<&Cell>, InvalidPositionError> {
        self.require_valid(pos, "Sheet::get_cell")?;
        Ok(self.cells.get(&pos))
    }

    /// Sets the contents of `pos` from raw text, per the shape of `text`:
    /// empty -> Empty, a leading `=` with more to follow -> Formula,
    /// anything else -> Text. A formula edit is one atomic transaction —
    /// either it commits in full (contents, graph edges, and every
    /// transitively affected cache) or nothing about the sheet changes.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<(), SetCellError> {
        self.require_valid(pos, "Sheet::set_cell")?;

        if let Some(body) = text.strip_prefix('=') {
            if !body.is_empty() {
                return self.set_formula_cell(pos, body);
            }
        }

        let new_cell = if text.is_empty() { Cell::Empty } else { Cell::Text(text.to_string()) };
        self.graph.clear_dependencies(pos);
        self.commit_cell(pos, new_cell);
        self.recompute_dependents(pos);
        Ok(())
    }

    fn set_formula_cell(&mut self, pos: Position, body: &str) -> Result<(), SetCellError> {
        let formula = Formula::parse(body).map_err(FormulaException::from)?;

        let new_deps: HashSet<Position> = formula.get_referenced_cells().iter().copied().collect();

        let bounds_before_placeholders = (self.max_row, self.max_col);
        let mut inserted_placeholders = Vec::new();
        for &dep in &new_deps {
            if !self.cells.contains_key(&dep) {
                self.cells.insert(dep, Cell::Empty);
                self.touch_bounds(dep);
                inserted_placeholders.push(dep);
            }
        }

        let old_deps = self.graph.get_dependencies(pos);
        self.graph.set_dependencies(pos, new_deps);

        if let Some(cycle) = self.graph.find_cycle_through(pos) {
            self.graph.set_dependencies(pos, old_deps);
            for dep in inserted_placeholders {
                self.cells.remove(&dep);
            }
            (self.max_row, self.max_col) = bounds_before_placeholders;
            return Err(SetCellError::from(CircularDependencyError { cycle }));
        }

        let cached = formula.evaluate(self);
        self.commit_cell(pos, Cell::Formula { formula, cached });
        self.recompute_dependents(pos);
        Ok(())
    }

    pub fn clear_cell(&mut self, pos: Position) -> Result<(), InvalidPositionError> {
        self.require_valid(pos, "Sheet::clear_cell")?;
        let affected = self.graph.transitive_dependents(pos);
        self.graph.remove_cell(pos);
        let was_boundary = pos.row == self.max_row || pos.col == self.max_col;
        self.cells.remove(&pos);
        if was_boundary {
            self.recalculate_bounds();
        }
        self.recompute_set(&affected);
        Ok(())
    }

    pub fn get_printable_size(&self) -> Size {
        if self.cells.is_empty() {
            Size { rows: 0, cols: 0 }
        } else {
            Size { rows: self.max_row + 1, cols: self.max_col + 1 }
        }
    }

    pub fn print_values(&self) -> String {
        self.print_with(|cell| cell.get_value().to_string())
    }

    pub fn print_texts(&self) -> String {
        self.print_with(|cell| cell.get_text())
    }

    fn print_with(&self, render: impl Fn(&Cell) -> String) -> String {
        let size = self.get_printable_size();
        let mut out = String::new();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    out.push('\t');
                }
                if let Some(cell) = self.cells.get(&Position::new(row, col)) {
                    out.push_str(&render(cell));
                }
            }
            out.push('\n');
        }
        out
    }

    fn require_valid(&self, pos: Position, context: &str) -> Result<(), InvalidPositionError> {
        if pos.is_valid() {
            Ok(())
        } else {
            Err(InvalidPositionError::new(pos, context))
        }
    }

    fn commit_cell(&mut self, pos: Position, cell: Cell) {
        self.touch_bounds(pos);
        self.cells.insert(pos, cell);
    }

    fn touch_bounds(&mut self, pos: Position) {
        if pos.row > self.max_row {
            self.max_row = pos.row;
        }
        if pos.col > self.max_col {
            self.max_col = pos.col;
        }
    }

    fn recalculate_bounds(&mut self) {
        let (mut max_row, mut max_col) = (0, 0);
        for pos in self.cells.keys() {
            max_row = max_row.max(pos.row);
            max_col = max_col.max(pos.col);
        }
        self.max_row = max_row;
        self.max_col = max_col;
    }

    /// Re-evaluates every formula cell transitively downstream of `pos`,
    /// in dependency order, so each sees only already-fresh precedents.
    fn recompute_dependents(&mut self, pos: Position) {
        let affected = self.graph.transitive_dependents(pos);
        self.recompute_set(&affected);
    }

    /// Re-evaluates every formula cell in `affected`, in dependency order.
    /// Callers that need to read the graph before mutating it (e.g.
    /// `clear_cell`, which removes `pos`'s edges) compute the affected set
    /// up front and pass it here instead of going through
    /// `recompute_dependents`.
    fn recompute_set(&mut self, affected: &HashSet<Position>) {
        if affected.is_empty() {
            return;
        }
        for cell_pos in self.graph.topological_order(affected) {
            let Some(Cell::Formula { formula, .. }) = self.cells.get(&cell_pos) else { continue };
            let fresh = formula.evaluate(self);
            if let Some(Cell::Formula { cached, .. }) = self.cells.get_mut(&cell_pos) {
                *cached = fresh;
            }
        }
    }
}

impl SheetView for Sheet {
    fn get_cell_value(&self, pos: Position) -> Option<CellValue> {
        self.cells.get(&pos).map(Cell::get_value)
    }
}
