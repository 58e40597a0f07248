use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::error::GridError;
use crate::parser;
use crate::walk::GuardState;

pub const OBSTACLE: char = '#';
pub const EMPTY_SPACE: char = '.';

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,    // ^
    Right, // >
    Down,  // v
    Left,  // <
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    pub fn turn_right(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '^' => Some(Self::Up),
            '>' => Some(Self::Right),
            'v' => Some(Self::Down),
            '<' => Some(Self::Left),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Up => '^',
            Self::Right => '>',
            Self::Down => 'v',
            Self::Left => '<',
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Anything the guard can walk over: a bounded rectangle where some cells block.
pub trait Terrain {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    fn is_obstacle(&self, position: Position) -> bool;

    fn contains(&self, position: Position) -> bool {
        position.row < self.rows() && position.col < self.cols()
    }

    /// The cell one step from `position` towards `direction`, or `None` past the edge.
    fn ahead(&self, position: Position, direction: Direction) -> Option<Position> {
        let Position { row, col } = position;
        let next = match direction {
            Direction::Up => Position::new(row.checked_sub(1)?, col),
            Direction::Down => Position::new(row + 1, col),
            Direction::Left => Position::new(row, col.checked_sub(1)?),
            Direction::Right => Position::new(row, col + 1),
        };
        self.contains(next).then_some(next)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    obstacles: Vec<bool>,
    rows: usize,
    cols: usize,
}

impl Grid {
    pub(crate) fn new(rows: usize, cols: usize) -> Self {
        Self {
            obstacles: vec![false; rows * cols],
            rows,
            cols,
        }
    }

    pub(crate) fn place_obstacle(&mut self, position: Position) {
        let index = self.index(position);
        self.obstacles[index] = true;
    }

    fn index(&self, position: Position) -> usize {
        position.row * self.cols + position.col
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows)
            .cartesian_product(0..self.cols)
            .map(|(row, col)| Position::new(row, col))
    }
}

impl Terrain for Grid {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn is_obstacle(&self, position: Position) -> bool {
        self.contains(position) && self.obstacles[self.index(position)]
    }
}

/// A read-only terrain with one extra obstacle laid over it.
#[derive(Debug, Clone, Copy)]
pub struct WithObstacle<'a, T> {
    terrain: &'a T,
    obstacle: Position,
}

impl<'a, T: Terrain> WithObstacle<'a, T> {
    pub fn new(terrain: &'a T, obstacle: Position) -> Self {
        Self { terrain, obstacle }
    }
}

impl<T: Terrain> Terrain for WithObstacle<'_, T> {
    fn rows(&self) -> usize {
        self.terrain.rows()
    }

    fn cols(&self) -> usize {
        self.terrain.cols()
    }

    fn is_obstacle(&self, position: Position) -> bool {
        position == self.obstacle || self.terrain.is_obstacle(position)
    }
}

/// The lab: obstacle layout plus where and how the guard starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    pub grid: Grid,
    pub guard: GuardState,
}

impl Map {
    pub fn new(input: &str) -> Result<Self, GridError> {
        parser::parse_map(input)
    }

    pub fn start(&self) -> Position {
        self.guard.position
    }
}

impl Display for Map {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let position = Position::new(row, col);
                let cell = if position == self.start() {
                    self.guard.direction.glyph()
                } else if self.grid.is_obstacle(position) {
                    OBSTACLE
                } else {
                    EMPTY_SPACE
                };
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
