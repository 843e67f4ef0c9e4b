//! Error types raised by the Sheet's public surface.

use std::fmt;

use parser::{ParsingError, Position};

/// A Position outside the valid grid was supplied to a Sheet method.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidPositionError {
    pub position: Position,
    pub context: String,
}

impl InvalidPositionError {
    pub fn new(position: Position, context: impl Into<String>) -> Self {
        InvalidPositionError { position, context: context.into() }
    }
}

impl fmt::Display for InvalidPositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: position ({}, {}) is out of range", self.context, self.position.row, self.position.col)
    }
}

impl std::error::Error for InvalidPositionError {}

/// A cell's formula text failed to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaException {
    pub source: ParsingError,
}

impl fmt::Display for FormulaException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "formula exception: {}", self.source)
    }
}

impl std::error::Error for FormulaException {}

impl From<ParsingError> for FormulaException {
    fn from(source: ParsingError) -> Self {
        FormulaException { source }
    }
}

/// Setting a cell's formula would introduce a cycle in the dependency
/// graph. Carries the cycle as a sequence of positions, starting and
/// ending at the same cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularDependencyError {
    pub cycle: Vec<Position>,
}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "circular dependency detected: ")?;
        for (i, pos) in self.cycle.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{pos}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CircularDependencyError {}

/// The union of everything `Sheet::set_cell` can fail with.
#[derive(Debug, Clone, PartialEq)]
pub enum SetCellError {
    InvalidPosition(InvalidPositionError),
    Formula(FormulaException),
    Circular(CircularDependencyError),
}

impl fmt::Display for SetCellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetCellError::InvalidPosition(e) => write!(f, "{e}"),
            SetCellError::Formula(e) => write!(f, "{e}"),
            SetCellError::Circular(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SetCellError {}

impl From<InvalidPositionError> for SetCellError {
    fn from(e: InvalidPositionError) -> Self {
        SetCellError::InvalidPosition(e)
    }
}

impl From<FormulaException> for SetCellError {
    fn from(e: FormulaException) -> Self {
        SetCellError::Formula(e)
    }
}

impl From<CircularDependencyError> for SetCellError {
    fn from(e: CircularDependencyError) -> Self {
        SetCellError::Circular(e)
    }
}
