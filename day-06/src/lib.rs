pub mod config;
pub mod error;
pub mod grid;
pub mod parser;
pub mod part1;
pub mod part2;
pub mod search;
pub mod walk;
