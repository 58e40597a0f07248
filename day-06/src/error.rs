use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::grid::Position;

#[derive(Debug, Error, Diagnostic)]
pub enum GridError {
    #[error("Input contains no grid rows")]
    #[diagnostic(code(grid::empty))]
    Empty,

    #[error("Row {row} has {found} cells, expected {expected}")]
    #[diagnostic(
        code(grid::ragged),
        help("Every row of the grid must be the same length")
    )]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
        #[source_code]
        src: String,
        #[label("this row")]
        span: SourceSpan,
    },

    #[error("Unexpected cell {found:?} at row {row}, column {col}")]
    #[diagnostic(
        code(grid::unexpected_cell),
        help("Cells must be one of '.', '#', '^', '>', 'v' or '<'")
    )]
    UnexpectedCell {
        found: char,
        row: usize,
        col: usize,
        #[source_code]
        src: String,
        #[label("not a grid cell")]
        span: SourceSpan,
    },

    #[error("No guard start marker found in the grid")]
    #[diagnostic(
        code(grid::missing_guard),
        help("Mark the guard's starting cell with one of '^', '>', 'v' or '<'")
    )]
    MissingGuard,

    #[error("Found a second guard at {second}, the first is at {first}")]
    #[diagnostic(code(grid::multiple_guards))]
    MultipleGuards { first: Position, second: Position },

    #[error("Parser error: {0}")]
    #[diagnostic(code(grid::parse))]
    Parse(String),
}

impl<E> From<nom::Err<E>> for GridError
where
    E: std::fmt::Debug,
{
    fn from(err: nom::Err<E>) -> Self {
        GridError::Parse(format!("Parsing failed: {:?}", err))
    }
}
