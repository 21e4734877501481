use uuid::Uuid;

use crate::{
    db::dao::{ClubDao, DaoBase},
    db::entities::club_member,
    error::AppError,
};

/// Club-scoped authorization for the acting member.
#[derive(Clone)]
pub struct ClubAccess {
    clubs: ClubDao,
}

impl ClubAccess {
    pub fn new(clubs: ClubDao) -> Self {
        Self { clubs }
    }

    /// The actor's membership in `club_id`. An unknown club is reported as
    /// not found before membership is judged.
    pub async fn membership(
        &self,
        club_id: &Uuid,
        actor: &Uuid,
    ) -> Result<club_member::Model, AppError> {
        if let Some(membership) = self.clubs.find_membership(club_id, actor).await? {
            return Ok(membership);
        }
        self.clubs.find_by_id(*club_id).await?;
        Err(AppError::forbidden("Not a member of this club"))
    }

    pub async fn leader(
        &self,
        club_id: &Uuid,
        actor: &Uuid,
    ) -> Result<club_member::Model, AppError> {
        let membership = self.membership(club_id, actor).await?;
        if !membership.is_leader() {
            return Err(AppError::forbidden("Club leader role required"));
        }
        Ok(membership)
    }
}
