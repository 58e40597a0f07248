use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::{debug, info, trace as trace_event};

use crate::grid::{Direction, Map, Position, Terrain, WithObstacle};
use crate::walk::{self, GuardState, Outcome};

/// Which cells get tried as the extra obstacle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidates {
    /// Every empty cell on the map.
    AllEmpty,
    /// Cells the guard crosses on the unobstructed walk.
    OriginalPath,
    /// The unobstructed walk plus the empty cells bordering it.
    PathNeighbours,
    Explicit(Vec<Position>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub position: Position,
    pub cycle: Vec<GuardState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchReport {
    pub tried: usize,
    pub placements: Vec<Placement>,
}

impl SearchReport {
    pub fn count(&self) -> usize {
        self.placements.len()
    }

    pub fn positions(&self) -> Vec<Position> {
        self.placements.iter().map(|p| p.position).collect()
    }
}

/// Resolves `candidates` to a sorted, de-duplicated list of cells that could
/// hold a new obstacle. The guard's own cell, existing obstacles and cells
/// off the grid are never returned.
///
/// A guard that already loops without help leaves nothing to induce, so
/// every strategy comes back empty.
pub fn candidate_cells(map: &Map, candidates: &Candidates) -> Vec<Position> {
    let original = walk::trace(&map.grid, map.guard);
    if original.outcome.is_loop() {
        debug!("guard loops without an extra obstacle");
        return vec![];
    }

    let cells: BTreeSet<Position> = match candidates {
        Candidates::AllEmpty => map.grid.positions().collect(),
        Candidates::OriginalPath => original.visited.into_iter().collect(),
        Candidates::PathNeighbours => original
            .visited
            .iter()
            .flat_map(|&position| {
                Direction::ALL
                    .into_iter()
                    .filter_map(move |direction| map.grid.ahead(position, direction))
                    .chain(std::iter::once(position))
            })
            .collect(),
        Candidates::Explicit(cells) => cells.iter().copied().collect(),
    };

    cells
        .into_iter()
        .filter(|&cell| {
            map.grid.contains(cell) && !map.grid.is_obstacle(cell) && cell != map.start()
        })
        .collect()
}

/// Counts the placements that trap the guard in a loop.
#[tracing::instrument(skip(map))]
pub fn count_loop_placements(map: &Map, candidates: &Candidates) -> usize {
    let cells = candidate_cells(map, candidates);
    debug!(candidates = cells.len(), "searching placements");

    let count = cells
        .par_iter()
        .filter(|&&cell| walk::loops(&WithObstacle::new(&map.grid, cell), map.guard))
        .count();

    info!(tried = cells.len(), count, "placement search finished");
    count
}

/// Like [`count_loop_placements`], but keeps each placement and the cycle it causes.
#[tracing::instrument(skip(map))]
pub fn find_loop_placements(map: &Map, candidates: &Candidates) -> SearchReport {
    let cells = candidate_cells(map, candidates);
    debug!(candidates = cells.len(), "searching placements");

    let placements: Vec<Placement> = cells
        .par_iter()
        .filter_map(|&cell| {
            let walk = walk::trace(&WithObstacle::new(&map.grid, cell), map.guard);
            trace_event!(%cell, looped = walk.outcome.is_loop(), "tried placement");
            match walk.outcome {
                Outcome::Looped { cycle } => Some(Placement {
                    position: cell,
                    cycle,
                }),
                Outcome::Exited => None,
            }
        })
        .collect();

    info!(
        tried = cells.len(),
        count = placements.len(),
        "placement search finished"
    );

    SearchReport {
        tried: cells.len(),
        placements,
    }
}
