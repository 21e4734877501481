use sea_orm::DatabaseConnection;

use super::{AssignmentDao, ChecklistDao, ClubDao, DaoBase, MemberDao, ScheduleDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn member(&self) -> MemberDao {
        DaoBase::new(&self.db)
    }

    pub fn club(&self) -> ClubDao {
        DaoBase::new(&self.db)
    }

    pub fn schedule(&self) -> ScheduleDao {
        DaoBase::new(&self.db)
    }

    pub fn checklist(&self) -> ChecklistDao {
        DaoBase::new(&self.db)
    }

    pub fn assignment(&self) -> AssignmentDao {
        DaoBase::new(&self.db)
    }
}
