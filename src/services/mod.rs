pub mod access;
pub mod checklist_service;
pub mod club_service;
pub mod context;
pub mod member_service;
pub mod schedule_service;

pub use context::ServiceContext;
