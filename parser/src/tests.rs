//! Larger end-to-end parser-level scenarios, kept separate from the
//! per-module unit tests.

use crate::formula::Formula;
use crate::position::Position;
use crate::value::{CellValue, EmptySheet};

fn eval(source: &str) -> CellValue {
    Formula::parse(source).unwrap().evaluate(&EmptySheet)
}

#[test]
fn nested_arithmetic_scenario() {
    assert_eq!(eval("(12+13) * (14+(13-24/(1+1))*55-46)"), CellValue::Number(575.0));
}

#[test]
fn pretty_print_collapses_redundant_parens() {
    assert_eq!(Formula::parse("( ( (  1) ) )").unwrap().get_expression(), "1");
    assert_eq!(Formula::parse("(2*3)+4").unwrap().get_expression(), "2*3+4");
    assert_eq!(Formula::parse("(2*3)-4").unwrap().get_expression(), "2*3-4");
}

#[test]
fn referenced_cells_uniqueness_scenario() {
    let f = Formula::parse("A1 + A2 + A1 + A3 + A1 + A2 + A1").unwrap();
    assert_eq!(
        f.get_referenced_cells(),
        &[Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)]
    );
}

#[test]
fn division_by_zero_scenario() {
    assert_eq!(eval("1/0"), CellValue::Error(crate::value::FormulaError::Div0));
}

#[test]
fn overflow_divide_scenario() {
    assert_eq!(eval("1e200/1e-200"), CellValue::Error(crate::value::FormulaError::Div0));
}

#[test]
fn pretty_printer_is_idempotent() {
    for source in ["1+2*3", "(1+2)*3", "1-(2-3)", "-(1+2)*3", "1/2/3"] {
        let once = Formula::parse(source).unwrap().get_expression();
        let twice = Formula::parse(&once).unwrap().get_expression();
        assert_eq!(once, twice, "idempotence failed for {source}");
    }
}
