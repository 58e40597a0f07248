use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::grid::{Direction, Map, Position, Terrain, EMPTY_SPACE, OBSTACLE};

pub const VISITED: char = 'X';
pub const CYCLE: char = 'O';

/// Everything that decides where the guard goes next.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GuardState {
    pub position: Position,
    pub direction: Direction,
}

impl GuardState {
    pub fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// One cell forward, same heading.
    Moved(GuardState),
    /// Blocked ahead: same cell, new heading.
    Turned(GuardState),
    /// The next cell is off the grid.
    Exited,
    /// Obstacles on all four sides.
    Trapped,
}

/// Advances the guard by one evaluation.
///
/// A blocked guard keeps rotating clockwise until some heading is free, so a
/// cell walled in on two adjacent sides costs a single turn. A heading that
/// faces the grid edge counts as free; the following step leaves the grid.
pub fn step<T: Terrain>(terrain: &T, state: GuardState) -> Step {
    let GuardState {
        position,
        direction,
    } = state;

    match terrain.ahead(position, direction) {
        None => Step::Exited,
        Some(next) if !terrain.is_obstacle(next) => {
            Step::Moved(GuardState::new(next, direction))
        }
        Some(_) => {
            let mut heading = direction;
            for _ in 0..3 {
                heading = heading.turn_right();
                let blocked = terrain
                    .ahead(position, heading)
                    .is_some_and(|cell| terrain.is_obstacle(cell));
                if !blocked {
                    return Step::Turned(GuardState::new(position, heading));
                }
            }
            Step::Trapped
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Exited,
    /// `cycle` holds the states from the first occurrence of the repeated
    /// state up to, but not including, the repeat.
    Looped { cycle: Vec<GuardState> },
}

impl Outcome {
    pub fn is_loop(&self) -> bool {
        matches!(self, Outcome::Looped { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    pub visited: HashSet<Position>,
    pub steps: usize,
    pub outcome: Outcome,
}

impl Walk {
    pub fn unique_locations(&self) -> usize {
        self.visited.len()
    }

    /// Draws the route over `map`: visited cells as `X`, cells on the cycle as `O`.
    pub fn render(&self, map: &Map) -> String {
        let cycle: HashSet<Position> = match &self.outcome {
            Outcome::Looped { cycle } => cycle.iter().map(|state| state.position).collect(),
            Outcome::Exited => HashSet::new(),
        };

        let mut out = String::with_capacity(map.grid.rows() * (map.grid.cols() + 1));
        for row in 0..map.grid.rows() {
            for col in 0..map.grid.cols() {
                let position = Position::new(row, col);
                out.push(if position == map.start() {
                    map.guard.direction.glyph()
                } else if map.grid.is_obstacle(position) {
                    OBSTACLE
                } else if cycle.contains(&position) {
                    CYCLE
                } else if self.visited.contains(&position) {
                    VISITED
                } else {
                    EMPTY_SPACE
                });
            }
            out.push('\n');
        }
        out
    }
}

/// Walks the guard from `start` until it leaves the grid or repeats a state.
///
/// Every state is recorded, so the loop is found on its first repeat and the
/// number of step evaluations never exceeds `rows * cols * 4`.
pub fn trace<T: Terrain>(terrain: &T, start: GuardState) -> Walk {
    let capacity = terrain.rows() * terrain.cols();
    let mut visited = HashSet::with_capacity(capacity);
    let mut history: HashMap<GuardState, usize> = HashMap::with_capacity(capacity);
    let mut trail: Vec<GuardState> = Vec::with_capacity(capacity);
    let mut state = start;

    let outcome = loop {
        if let Some(&first) = history.get(&state) {
            break Outcome::Looped {
                cycle: trail[first..].to_vec(),
            };
        }
        history.insert(state, trail.len());
        trail.push(state);
        visited.insert(state.position);

        match step(terrain, state) {
            Step::Moved(next) | Step::Turned(next) => state = next,
            Step::Exited => break Outcome::Exited,
            Step::Trapped => {
                let mut heading = state.direction;
                let cycle = (0..4)
                    .map(|_| {
                        let spin = GuardState::new(state.position, heading);
                        heading = heading.turn_right();
                        spin
                    })
                    .collect();
                break Outcome::Looped { cycle };
            }
        }
    };

    debug!(
        visited = visited.len(),
        steps = trail.len(),
        looped = outcome.is_loop(),
        "walk finished"
    );

    Walk {
        visited,
        steps: trail.len(),
        outcome,
    }
}

/// Loop check without the bookkeeping `trace` keeps.
///
/// A cycle always contains at least one turn, so only post-turn states are
/// remembered, in a dense `rows * cols * 4` table.
pub fn loops<T: Terrain>(terrain: &T, start: GuardState) -> bool {
    let cols = terrain.cols();
    let mut turned = vec![false; terrain.rows() * cols * 4];
    let mut state = start;

    loop {
        match step(terrain, state) {
            Step::Moved(next) => state = next,
            Step::Turned(next) => {
                let index = ((next.position.row * cols + next.position.col) << 2)
                    | next.direction.index();
                if turned[index] {
                    return true;
                }
                turned[index] = true;
                state = next;
            }
            Step::Exited => return false,
            Step::Trapped => return true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WithObstacle;
    use rstest::rstest;

    const EXAMPLE: &str = "....#.....
.........#
..........
..#.......
.......#..
..........
.#..^.....
........#.
#.........
......#...";

    #[test_log::test]
    fn test_example_walk() -> miette::Result<()> {
        let map = Map::new(EXAMPLE)?;
        let walk = trace(&map.grid, map.guard);

        assert_eq!(41, walk.unique_locations());
        assert_eq!(Outcome::Exited, walk.outcome);
        Ok(())
    }

    #[rstest]
    #[case::up("....\n.^..\n....", 2)]
    #[case::down("....\n.v..\n....\n....", 3)]
    #[case::left("....\n..<.\n....", 3)]
    #[case::right(">...\n....", 4)]
    fn test_open_grid_walks_straight_out(
        #[case] input: &str,
        #[case] expected: usize,
    ) -> miette::Result<()> {
        let map = Map::new(input)?;
        let walk = trace(&map.grid, map.guard);

        assert_eq!(Outcome::Exited, walk.outcome);
        assert_eq!(expected, walk.unique_locations());
        assert_eq!(expected, walk.steps);
        Ok(())
    }

    #[rstest]
    #[case::free("...\n.^.", Step::Moved(GuardState::new(Position::new(0, 1), Direction::Up)))]
    #[case::edge(".^.", Step::Exited)]
    #[case::single_turn(".#.\n.^.\n...", Step::Turned(GuardState::new(Position::new(1, 1), Direction::Right)))]
    #[case::left_and_up(".#.\n#^.\n...", Step::Turned(GuardState::new(Position::new(1, 1), Direction::Right)))]
    #[case::up_and_right(".#.\n.^#\n...", Step::Turned(GuardState::new(Position::new(1, 1), Direction::Down)))]
    #[case::three_sides(".#.\n.^#\n.#.", Step::Turned(GuardState::new(Position::new(1, 1), Direction::Left)))]
    #[case::turn_towards_edge("#\n^", Step::Turned(GuardState::new(Position::new(1, 0), Direction::Right)))]
    #[case::boxed_in(".#.\n#^#\n.#.", Step::Trapped)]
    fn test_step(#[case] input: &str, #[case] expected: Step) -> miette::Result<()> {
        let map = Map::new(input)?;
        assert_eq!(expected, step(&map.grid, map.guard));
        Ok(())
    }

    #[test]
    fn test_adjacent_obstacles_walk() -> miette::Result<()> {
        let map = Map::new(".#.\n.^#\n...")?;
        let walk = trace(&map.grid, map.guard);

        assert_eq!(Outcome::Exited, walk.outcome);
        assert_eq!(
            HashSet::from([Position::new(1, 1), Position::new(2, 1)]),
            walk.visited
        );
        Ok(())
    }

    #[test]
    fn test_boxed_in_guard_loops_in_place() -> miette::Result<()> {
        let map = Map::new(".#.\n#>#\n.#.")?;
        let walk = trace(&map.grid, map.guard);
        let position = Position::new(1, 1);

        assert_eq!(
            Outcome::Looped {
                cycle: vec![
                    GuardState::new(position, Direction::Right),
                    GuardState::new(position, Direction::Down),
                    GuardState::new(position, Direction::Left),
                    GuardState::new(position, Direction::Up),
                ]
            },
            walk.outcome
        );
        assert_eq!(1, walk.unique_locations());
        assert!(loops(&map.grid, map.guard));
        Ok(())
    }

    #[test]
    fn test_small_loop_cycle() -> miette::Result<()> {
        // The guard circles a 2x2 ring inside four pillars.
        let input = "\
.#..
.^.#
#...
..#.";
        let map = Map::new(input)?;
        let walk = trace(&map.grid, map.guard);

        let Outcome::Looped { cycle } = &walk.outcome else {
            panic!("expected a loop, got {:?}", walk.outcome);
        };
        let ring: HashSet<Position> = cycle.iter().map(|state| state.position).collect();
        assert_eq!(
            HashSet::from([
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(2, 1),
                Position::new(2, 2),
            ]),
            ring
        );
        assert_eq!(8, cycle.len());
        Ok(())
    }

    #[test]
    fn test_trace_is_deterministic() -> miette::Result<()> {
        let map = Map::new(EXAMPLE)?;
        let blocked = WithObstacle::new(&map.grid, Position::new(6, 3));

        assert_eq!(trace(&map.grid, map.guard), trace(&map.grid, map.guard));
        assert_eq!(trace(&blocked, map.guard), trace(&blocked, map.guard));
        Ok(())
    }

    #[test]
    fn test_step_bound() -> miette::Result<()> {
        let map = Map::new(EXAMPLE)?;
        let bound = map.grid.rows() * map.grid.cols() * 4;

        for position in map.grid.positions() {
            let walk = trace(&WithObstacle::new(&map.grid, position), map.guard);
            assert!(walk.steps <= bound, "{} steps with obstacle at {}", walk.steps, position);
        }
        Ok(())
    }

    #[test]
    fn test_fast_check_agrees_with_trace() -> miette::Result<()> {
        let map = Map::new(EXAMPLE)?;

        for position in map.grid.positions().filter(|&p| p != map.start()) {
            let terrain = WithObstacle::new(&map.grid, position);
            assert_eq!(
                trace(&terrain, map.guard).outcome.is_loop(),
                loops(&terrain, map.guard),
                "disagreement with obstacle at {}",
                position
            );
        }
        Ok(())
    }

    #[test]
    fn test_render_marks_route() -> miette::Result<()> {
        let map = Map::new("#...\n...#\n^...")?;
        let walk = trace(&map.grid, map.guard);

        assert_eq!("#...\nXXX#\n^.X.\n", walk.render(&map));
        Ok(())
    }

    #[test]
    fn test_render_marks_cycle() -> miette::Result<()> {
        let input = "\
.#..
.^.#
#...
..#.";
        let map = Map::new(input)?;
        let walk = trace(&map.grid, map.guard);

        assert_eq!(".#..\n.^O#\n#OO.\n..#.\n", walk.render(&map));
        Ok(())
    }
}
