mod generator;
mod runner;

pub use generator::*;
pub use runner::*;
