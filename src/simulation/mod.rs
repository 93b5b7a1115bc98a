pub mod game;
pub mod roster;
pub mod schedule;

pub use game::Simulation;
pub use roster::{Departure, Roster};
pub use schedule::{ManualScheduler, Schedule, Scheduler, TokioScheduler};
