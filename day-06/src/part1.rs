use tracing::info;

use crate::grid::Map;
use crate::walk::{self, Walk};

#[tracing::instrument(skip(input))]
pub fn process(input: &str) -> miette::Result<String> {
    let (_, walk) = patrol(input)?;
    Ok(walk.unique_locations().to_string())
}

/// Parses the map and walks the guard without any extra obstacle.
pub fn patrol(input: &str) -> miette::Result<(Map, Walk)> {
    let map = Map::new(input)?;
    let walk = walk::trace(&map.grid, map.guard);
    info!(
        visited = walk.unique_locations(),
        looped = walk.outcome.is_loop(),
        "patrol finished"
    );
    Ok((map, walk))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process() -> miette::Result<()> {
        let input = "....#.....
.........#
..........
..#.......
.......#..
..........
.#..^.....
........#.
#.........
......#...";
        assert_eq!("41", process(input)?);
        Ok(())
    }

    #[test]
    fn test_process_rejects_bad_grid() {
        assert!(process("...\n.#.").is_err());
    }
}
