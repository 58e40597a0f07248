use nom::{
    character::complete::{line_ending, multispace0, none_of, space0},
    combinator::all_consuming,
    multi::{many1, separated_list1},
    sequence::terminated,
    IResult,
};
use nom_locate::LocatedSpan;
use tracing::debug;

use crate::error::GridError;
use crate::grid::{Direction, Grid, Map, Position, EMPTY_SPACE, OBSTACLE};
use crate::walk::GuardState;

pub type Span<'a> = LocatedSpan<&'a str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedCell<'a> {
    pub value: char,
    pub position: Span<'a>,
}

fn parse_cell(input: Span) -> IResult<Span, LocatedCell> {
    let (rest, value) = none_of(" \t\r\n")(input)?;
    Ok((
        rest,
        LocatedCell {
            value,
            position: input,
        },
    ))
}

pub fn parse_rows(input: Span) -> IResult<Span, Vec<Vec<LocatedCell>>> {
    all_consuming(terminated(
        separated_list1(line_ending, terminated(many1(parse_cell), space0)),
        multispace0,
    ))(input)
}

/// Parses the lab map, checking it is rectangular and holds exactly one guard.
pub fn parse_map(input: &str) -> Result<Map, GridError> {
    if input.trim().is_empty() {
        return Err(GridError::Empty);
    }

    let (_, rows) = parse_rows(Span::new(input))?;
    let cols = rows.first().map_or(0, Vec::len);

    let mut grid = Grid::new(rows.len(), cols);
    let mut guard: Option<GuardState> = None;

    for (row, cells) in rows.iter().enumerate() {
        if cells.len() != cols {
            let last = &cells[cells.len() - 1];
            let start = cells[0].position.location_offset();
            let end = last.position.location_offset() + last.value.len_utf8();
            return Err(GridError::Ragged {
                row,
                expected: cols,
                found: cells.len(),
                src: input.to_string(),
                span: (start, end - start).into(),
            });
        }

        for (col, cell) in cells.iter().enumerate() {
            let position = Position::new(row, col);
            match cell.value {
                OBSTACLE => grid.place_obstacle(position),
                EMPTY_SPACE => {}
                glyph => match Direction::from_glyph(glyph) {
                    Some(direction) => {
                        if let Some(first) = guard {
                            return Err(GridError::MultipleGuards {
                                first: first.position,
                                second: position,
                            });
                        }
                        guard = Some(GuardState::new(position, direction));
                    }
                    None => {
                        return Err(GridError::UnexpectedCell {
                            found: glyph,
                            row,
                            col,
                            src: input.to_string(),
                            span: (cell.position.location_offset(), glyph.len_utf8()).into(),
                        })
                    }
                },
            }
        }
    }

    let guard = guard.ok_or(GridError::MissingGuard)?;
    debug!(rows = rows.len(), cols, ?guard, "parsed map");

    Ok(Map { grid, guard })
}
