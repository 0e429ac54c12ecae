pub mod route;
pub mod workout;

pub use route::*;
pub use workout::*;
