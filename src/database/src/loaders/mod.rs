mod route;
mod runner;
mod tunables;
mod workout;

pub use route::*;
pub use runner::*;
pub use tunables::*;
pub use workout::*;
