pub mod assignments;
pub mod checklists;
pub mod clubs;
pub mod members;
mod router;
pub mod schedules;

pub use router::router;
