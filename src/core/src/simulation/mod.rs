pub mod activity;
pub mod cancellation;
pub mod context;
pub mod controller;
pub mod driver;
pub mod engine;
pub mod events;
pub mod gravity;
pub mod race;
pub mod result;
pub mod session;
pub mod state;
pub mod stepper;
pub mod workout;

pub use activity::*;
pub use cancellation::*;
pub use context::*;
pub use controller::*;
pub use driver::*;
pub use engine::*;
pub use events::*;
pub use gravity::*;
pub use race::*;
pub use result::*;
pub use session::*;
pub use state::*;
pub use stepper::*;
pub use workout::*;
