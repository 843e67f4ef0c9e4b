//! The facade a cell holds onto: parses formula text once, then offers
//! evaluation, canonical printing, and the referenced-cells list.

use crate::ast::Expr;
use crate::parser::{ParseResult, Parser};
use crate::position::Position;
use crate::value::{CellValue, SheetView};

#[derive(Debug, Clone)]
pub struct Formula {
    root: Expr,
    /// Sorted, deduplicated positions referenced anywhere in the tree.
    referenced_cells: Vec<Position>,
}

impl Formula {
    /// Parses `source` (the formula body, without a leading `=`).
    pub fn parse(source: &str) -> ParseResult<Formula> {
        let root = Parser::parse(source)?;
        let mut referenced_cells = Vec::new();
        root.collect_refs(&mut referenced_cells);
        referenced_cells.sort();
        referenced_cells.dedup();
        Ok(Formula { root, referenced_cells })
    }

    pub fn evaluate(&self, sheet: &dyn SheetView) -> CellValue {
        self.root.evaluate(sheet)
    }

    /// Canonical, minimally-parenthesized textual form of the formula.
    pub fn get_expression(&self) -> String {
        self.root.print_formula()
    }

    pub fn get_referenced_cells(&self) -> &[Position] {
        &self.referenced_cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::EmptySheet;

    #[test]
    fn referenced_cells_are_sorted_and_deduped() {
        let f = Formula::parse("A1+B2+A1").unwrap();
        assert_eq!(f.get_referenced_cells(), &[Position::new(0, 0), Position::new(1, 1)]);
    }

    #[test]
    fn get_expression_round_trips_through_reparse() {
        let f = Formula::parse("1+2*3-(4/5)").unwrap();
        let printed = f.get_expression();
        let reparsed = Formula::parse(&printed).unwrap();
        assert_eq!(reparsed.get_expression(), printed);
    }

    #[test]
    fn evaluate_with_no_references() {
        let f = Formula::parse("2*(3+4)").unwrap();
        assert_eq!(f.evaluate(&EmptySheet), CellValue::Number(14.0));
    }

    #[test]
    fn parse_error_on_malformed_source() {
        assert!(Formula::parse("1+").is_err());
    }
}
