//! Game module - session state shared across environments

mod context;
mod time;

pub use context::{GameContext, Location};
pub use time::{Clock, TimeOfDay, MINUTES_PER_DAY};
