use uuid::Uuid;

use crate::{
    db::dao::{ClubDao, DaoBase, MemberDao, PaginatedResponse, ScheduleDao},
    db::entities::{club, club_member, club_member::ClubRole, schedule},
    error::AppError,
    services::access::ClubAccess,
};

#[derive(Clone)]
pub struct ClubService {
    club_dao: ClubDao,
    schedule_dao: ScheduleDao,
    member_dao: MemberDao,
    access: ClubAccess,
    page_size: u64,
}

impl ClubService {
    pub fn new(
        club_dao: ClubDao,
        schedule_dao: ScheduleDao,
        member_dao: MemberDao,
        access: ClubAccess,
        page_size: u64,
    ) -> Self {
        Self {
            club_dao,
            schedule_dao,
            member_dao,
            access,
            page_size,
        }
    }

    /// Creates a club with the actor as its first leader. The actor needs a
    /// saved profile.
    pub async fn create_club(
        &self,
        actor: &Uuid,
        name: &str,
        description: &str,
        display_name: Option<&str>,
    ) -> Result<(club::Model, club_member::Model), AppError> {
        let name = non_blank("Club name", name)?;
        let profile = self.member_dao.find_by_id(*actor).await?;
        let display_name = display_name
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(profile.name.as_str());

        let (club, leader) = self
            .club_dao
            .create_with_leader(name, description.trim(), actor, display_name)
            .await?;
        tracing::info!(club_id = %club.id, leader = %actor, "club created");
        Ok((club, leader))
    }

    pub async fn get_club(&self, actor: &Uuid, id: &Uuid) -> Result<club::Model, AppError> {
        self.access.membership(id, actor).await?;
        Ok(self.club_dao.find_by_id(*id).await?)
    }

    pub async fn add_member(
        &self,
        actor: &Uuid,
        club_id: &Uuid,
        member_id: &Uuid,
        display_name: Option<&str>,
        role: ClubRole,
    ) -> Result<club_member::Model, AppError> {
        self.access.leader(club_id, actor).await?;
        let profile = self.member_dao.find_by_id(*member_id).await?;
        let display_name = display_name
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(profile.name.as_str());

        let membership = self
            .club_dao
            .add_member(club_id, member_id, display_name, role)
            .await
            .inspect_err(|err| tracing::warn!(%club_id, %member_id, error = %err, "join rejected"))?;
        tracing::info!(%club_id, %member_id, role = role.as_str(), "member joined club");
        Ok(membership)
    }

    pub async fn list_members(
        &self,
        actor: &Uuid,
        club_id: &Uuid,
    ) -> Result<Vec<club_member::Model>, AppError> {
        self.access.membership(club_id, actor).await?;
        Ok(self.club_dao.list_members(club_id).await?)
    }

    /// Schedules of the club ordered by start date.
    pub async fn list_schedules(
        &self,
        actor: &Uuid,
        club_id: &Uuid,
        page: u64,
    ) -> Result<PaginatedResponse<schedule::Model>, AppError> {
        self.access.membership(club_id, actor).await?;
        Ok(self
            .schedule_dao
            .list_for_club(club_id, page, self.page_size)
            .await?)
    }
}

fn non_blank<'a>(label: &str, value: &'a str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(format!("{label} required")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::db::entities::member;
    use crate::services::ServiceContext;

    #[tokio::test]
    async fn club_name_is_required() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = ServiceContext::new(&db).club();

        let err = service
            .create_club(&Uuid::new_v4(), "  ", "", None)
            .await
            .expect_err("blank name should fail");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn creator_without_profile_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<member::Model>::new()])
            .into_connection();
        let service = ServiceContext::new(&db).club();

        let err = service
            .create_club(&Uuid::new_v4(), "Hikers", "Weekend trails", None)
            .await
            .expect_err("unknown creator should fail");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
