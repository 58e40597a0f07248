use clap::Parser;
use day_06::config::{init_tracing, Args};
use day_06::grid::Map;
use day_06::search::{find_loop_placements, Candidates};
use day_06::walk;
use miette::Context;

#[tracing::instrument]
fn main() -> miette::Result<()> {
    init_tracing();

    let args = Args::parse();
    let file = args.read_input("input2.txt")?;
    let map = Map::new(&file).context("process part 2")?;
    let report = find_loop_placements(&map, &Candidates::from(args.candidates));

    if args.render {
        print!("{}", walk::trace(&map.grid, map.guard).render(&map));
    }
    if args.placements {
        for placement in &report.placements {
            println!("{} (cycle of {} states)", placement.position, placement.cycle.len());
        }
    }
    println!("{}", report.count());
    Ok(())
}
