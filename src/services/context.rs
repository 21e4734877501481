use sea_orm::DatabaseConnection;

use crate::{
    config::GeneralConfig,
    db::dao::DaoContext,
    services::{
        access::ClubAccess, checklist_service::ChecklistService, club_service::ClubService,
        member_service::MemberService, schedule_service::ScheduleService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
    page_size: u64,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
            page_size: GeneralConfig::default().page_size,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self {
            daos: DaoContext::new(&state.db),
            page_size: state.config.general.page_size,
        }
    }

    fn access(&self) -> ClubAccess {
        ClubAccess::new(self.daos.club())
    }

    pub fn schedule(&self) -> ScheduleService {
        ScheduleService::new(self.daos.schedule(), self.daos.checklist(), self.access())
    }

    pub fn checklist(&self) -> ChecklistService {
        ChecklistService::new(
            self.daos.checklist(),
            self.daos.assignment(),
            self.daos.club(),
            self.access(),
        )
    }

    pub fn club(&self) -> ClubService {
        ClubService::new(
            self.daos.club(),
            self.daos.schedule(),
            self.daos.member(),
            self.access(),
            self.page_size,
        )
    }

    pub fn member(&self) -> MemberService {
        MemberService::new(self.daos.member())
    }
}
