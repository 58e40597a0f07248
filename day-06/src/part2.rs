use crate::grid::{Map, Position};
use crate::search::{self, Candidates, SearchReport};

#[tracing::instrument(skip(input))]
pub fn process(input: &str) -> miette::Result<(Vec<Position>, String)> {
    let report = process_with(input, &Candidates::OriginalPath)?;
    Ok((report.positions(), report.count().to_string()))
}

pub fn process_with(input: &str, candidates: &Candidates) -> miette::Result<SearchReport> {
    let map = Map::new(input)?;
    Ok(search::find_loop_placements(&map, candidates))
}

pub fn count_with(input: &str, candidates: &Candidates) -> miette::Result<usize> {
    let map = Map::new(input)?;
    Ok(search::count_loop_placements(&map, candidates))
}
