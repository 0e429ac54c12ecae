pub mod constants;
pub mod costs;
pub mod pace;

pub use constants::*;
pub use costs::*;
pub use pace::*;
