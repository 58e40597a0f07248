use clap::Parser;
use day_06::config::{init_tracing, Args};
use day_06::part1::patrol;
use miette::Context;

#[tracing::instrument]
fn main() -> miette::Result<()> {
    init_tracing();

    let args = Args::parse();
    let file = args.read_input("input1.txt")?;
    let (map, walk) = patrol(&file).context("process part 1")?;
    if args.render {
        print!("{}", walk.render(&map));
    }
    println!("{}", walk.unique_locations());
    Ok(())
}
