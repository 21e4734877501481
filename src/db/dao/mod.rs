pub mod assignment_dao;
pub mod base;
pub mod base_traits;
pub mod checklist_dao;
pub mod club_dao;
mod context;
pub mod error;
pub mod member_dao;
pub mod schedule_dao;

pub use assignment_dao::AssignmentDao;
pub use base::{DaoBase, DaoPager, PageRequest, PaginatedResponse, stamp_new};
pub use base_traits::{HasCreatedAtColumn, HasIdActiveModel, Identified, TimestampedActiveModel};
pub use checklist_dao::ChecklistDao;
pub use club_dao::ClubDao;
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use member_dao::MemberDao;
pub use schedule_dao::{ScheduleDao, ScheduleDetails};
