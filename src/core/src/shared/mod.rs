pub mod curve;
pub mod fullname;

pub use curve::*;
pub use fullname::*;
