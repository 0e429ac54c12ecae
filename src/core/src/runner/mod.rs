pub mod attributes;
pub mod builder;
pub mod collection;
pub mod history;
pub mod progression;
pub mod result;
pub mod runner;

pub use attributes::*;
pub use builder::*;
pub use collection::*;
pub use history::*;
pub use progression::*;
pub use result::*;
pub use runner::*;
