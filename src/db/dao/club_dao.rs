use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, stamp_new};
use crate::db::entities::club_member::ClubRole;
use crate::db::entities::prelude::{Club, ClubMember};
use crate::db::entities::{club, club_member};

const ALREADY_MEMBER: &str = "Member already belongs to this club";

#[derive(Clone)]
pub struct ClubDao {
    db: DatabaseConnection,
}

impl DaoBase for ClubDao {
    type Entity = Club;
    const ENTITY_NAME: &'static str = "club";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Clone)]
struct ClubMemberDao {
    db: DatabaseConnection,
}

impl DaoBase for ClubMemberDao {
    type Entity = ClubMember;
    const ENTITY_NAME: &'static str = "club member";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ClubDao {
    fn membership_dao(&self) -> ClubMemberDao {
        ClubMemberDao::new(&self.db)
    }

    /// Creates the club and enrolls `leader_id` as its first leader.
    pub async fn create_with_leader(
        &self,
        name: &str,
        description: &str,
        leader_id: &Uuid,
        display_name: &str,
    ) -> DaoResult<(club::Model, club_member::Model)> {
        let txn = self.db.begin().await.map_err(DaoLayerError::Db)?;

        let mut club = club::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            ..Default::default()
        };
        stamp_new(&mut club);
        let club = club.insert(&txn).await.map_err(DaoLayerError::Db)?;

        let mut leader = club_member::ActiveModel {
            club_id: Set(club.id),
            member_id: Set(*leader_id),
            display_name: Set(display_name.to_string()),
            role: Set(ClubRole::Leader.as_str().to_string()),
            ..Default::default()
        };
        stamp_new(&mut leader);
        let leader = leader.insert(&txn).await.map_err(DaoLayerError::Db)?;

        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok((club, leader))
    }

    pub async fn add_member(
        &self,
        club_id: &Uuid,
        member_id: &Uuid,
        display_name: &str,
        role: ClubRole,
    ) -> DaoResult<club_member::Model> {
        let model = club_member::ActiveModel {
            club_id: Set(*club_id),
            member_id: Set(*member_id),
            display_name: Set(display_name.to_string()),
            role: Set(role.as_str().to_string()),
            ..Default::default()
        };

        match self.membership_dao().create(model).await {
            Ok(created) => Ok(created),
            Err(DaoLayerError::Db(err)) => Err(DaoLayerError::from_write(err, ALREADY_MEMBER)),
            Err(other) => Err(other),
        }
    }

    pub async fn find_membership(
        &self,
        club_id: &Uuid,
        member_id: &Uuid,
    ) -> DaoResult<Option<club_member::Model>> {
        ClubMember::find()
            .filter(club_member::Column::ClubId.eq(*club_id))
            .filter(club_member::Column::MemberId.eq(*member_id))
            .one(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn find_membership_by_id(&self, id: &Uuid) -> DaoResult<club_member::Model> {
        self.membership_dao().find_by_id(*id).await
    }

    pub async fn list_members(&self, club_id: &Uuid) -> DaoResult<Vec<club_member::Model>> {
        let club_id = *club_id;
        self.membership_dao()
            .find_iter(
                None,
                Some((club_member::Column::CreatedAt, Order::Asc)),
                move |query| query.filter(club_member::Column::ClubId.eq(club_id)),
            )
            .collect_all()
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::ClubDao;
    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::db::entities::club_member::{self, ClubRole};

    fn membership(club_id: Uuid, role: ClubRole) -> club_member::Model {
        let now = FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid");
        club_member::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            club_id,
            member_id: Uuid::new_v4(),
            display_name: "Alice".to_string(),
            role: role.as_str().to_string(),
        }
    }

    #[tokio::test]
    async fn list_members_reads_single_page() {
        let club_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                membership(club_id, ClubRole::Leader),
                membership(club_id, ClubRole::Member),
            ]])
            .into_connection();
        let dao = ClubDao::new(&db);

        let members = dao.list_members(&club_id).await.expect("query should succeed");
        assert_eq!(members.len(), 2);
        assert!(members[0].is_leader());
        assert!(!members[1].is_leader());
    }

    #[tokio::test]
    async fn find_membership_by_id_reports_missing_row() {
        let missing = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<club_member::Model>::new()])
            .into_connection();
        let dao = ClubDao::new(&db);

        let err = dao
            .find_membership_by_id(&missing)
            .await
            .expect_err("missing membership should fail");
        assert!(matches!(
            err,
            DaoLayerError::NotFound { entity: "club member", id } if id == missing
        ));
    }
}
