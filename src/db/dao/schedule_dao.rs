use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, Order, QueryFilter, Set, TransactionTrait, prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use super::{
    ChecklistDao, DaoBase, DaoLayerError, DaoResult, PaginatedResponse, checklist_dao, stamp_new,
};
use crate::db::entities::{checklist, prelude::Schedule, schedule};

const OVERLAP_MESSAGE: &str = "Schedule overlaps another active schedule of this club";

/// Validated schedule fields, shared by create and modify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDetails {
    pub title: String,
    pub content: String,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    pub spot: String,
}

#[derive(Clone)]
pub struct ScheduleDao {
    db: DatabaseConnection,
}

impl DaoBase for ScheduleDao {
    type Entity = Schedule;
    const ENTITY_NAME: &'static str = "schedule";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ScheduleDao {
    /// Inserts an active schedule for `club_id`. The overlap check and the
    /// insert share a transaction.
    pub async fn create_schedule(
        &self,
        club_id: &Uuid,
        details: ScheduleDetails,
    ) -> DaoResult<schedule::Model> {
        let txn = self.db.begin().await.map_err(DaoLayerError::Db)?;

        if find_overlapping(&txn, club_id, &details, None).await?.is_some() {
            return Err(DaoLayerError::Conflict(OVERLAP_MESSAGE.to_string()));
        }

        let mut active = schedule::ActiveModel {
            club_id: Set(*club_id),
            title: Set(details.title),
            content: Set(details.content),
            start_date: Set(details.start_date),
            end_date: Set(details.end_date),
            spot: Set(details.spot),
            is_active: Set(true),
            ..Default::default()
        };
        stamp_new(&mut active);
        let model = active.insert(&txn).await.map_err(DaoLayerError::Db)?;

        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(model)
    }

    /// Rewrites the descriptive fields. `club_id` and `is_active` are never
    /// touched here.
    pub async fn modify_schedule(
        &self,
        id: &Uuid,
        details: ScheduleDetails,
    ) -> DaoResult<schedule::Model> {
        let txn = self.db.begin().await.map_err(DaoLayerError::Db)?;

        let current = Schedule::find_by_id(*id)
            .one(&txn)
            .await
            .map_err(DaoLayerError::Db)?
            .ok_or_else(|| Self::not_found(*id))?;

        if current.is_active
            && find_overlapping(&txn, &current.club_id, &details, Some(id))
                .await?
                .is_some()
        {
            return Err(DaoLayerError::Conflict(OVERLAP_MESSAGE.to_string()));
        }

        let mut active = current.into_active_model();
        active.title = Set(details.title);
        active.content = Set(details.content);
        active.start_date = Set(details.start_date);
        active.end_date = Set(details.end_date);
        active.spot = Set(details.spot);
        active.updated_at = Set(chrono::Utc::now().fixed_offset());
        let model = active.update(&txn).await.map_err(DaoLayerError::Db)?;

        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(model)
    }

    pub async fn deactivate(&self, id: &Uuid) -> DaoResult<schedule::Model> {
        self.update(*id, |active| {
            active.is_active = Set(false);
        })
        .await
    }

    pub async fn list_for_club(
        &self,
        club_id: &Uuid,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<schedule::Model>> {
        let club_id = *club_id;
        self.find(
            page,
            page_size,
            Some((schedule::Column::StartDate, Order::Asc)),
            move |query| query.filter(schedule::Column::ClubId.eq(club_id)),
        )
        .await
    }

    /// Hard delete, permitted only while `can_delete` holds. The eligibility
    /// check and the cascade run in one transaction.
    pub async fn delete_if_eligible(&self, id: &Uuid) -> DaoResult<Uuid> {
        let txn = self.db.begin().await.map_err(DaoLayerError::Db)?;

        let schedule = Schedule::find_by_id(*id)
            .one(&txn)
            .await
            .map_err(DaoLayerError::Db)?
            .ok_or_else(|| Self::not_found(*id))?;
        let checklist = checklist_dao::find_for_schedule(&txn, id).await?;

        if !schedule.can_delete(checklist.as_ref()) {
            return Err(DaoLayerError::Conflict(
                "Schedule has an active checklist; deactivate it first".to_string(),
            ));
        }

        if let Some(checklist) = checklist {
            checklist_dao::purge_checklist(&txn, &checklist.id).await?;
        }
        Schedule::delete_by_id(*id)
            .exec(&txn)
            .await
            .map_err(DaoLayerError::Db)?;

        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(*id)
    }

    pub async fn checklist_of(&self, id: &Uuid) -> DaoResult<Option<checklist::Model>> {
        ChecklistDao::new(&self.db).find_by_schedule(id).await
    }
}

async fn find_overlapping<C: ConnectionTrait>(
    conn: &C,
    club_id: &Uuid,
    details: &ScheduleDetails,
    exclude: Option<&Uuid>,
) -> DaoResult<Option<schedule::Model>> {
    let mut query = Schedule::find()
        .filter(schedule::Column::ClubId.eq(*club_id))
        .filter(schedule::Column::IsActive.eq(true))
        .filter(schedule::Column::StartDate.lt(details.end_date))
        .filter(schedule::Column::EndDate.gt(details.start_date));
    if let Some(exclude) = exclude {
        query = query.filter(schedule::Column::Id.ne(*exclude));
    }
    query.one(conn).await.map_err(DaoLayerError::Db)
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::{ScheduleDao, ScheduleDetails};
    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::db::entities::{checklist, schedule};

    fn ts(hour: u32) -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2025, 6, 1, hour, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn details() -> ScheduleDetails {
        ScheduleDetails {
            title: "Hiking".to_string(),
            content: "Trail meetup".to_string(),
            start_date: ts(9),
            end_date: ts(17),
            spot: "Trailhead".to_string(),
        }
    }

    fn schedule_model(id: Uuid, club_id: Uuid, is_active: bool) -> schedule::Model {
        schedule::Model {
            id,
            created_at: ts(0),
            updated_at: ts(0),
            club_id,
            title: "Hiking".to_string(),
            content: "Trail meetup".to_string(),
            start_date: ts(9),
            end_date: ts(17),
            spot: "Trailhead".to_string(),
            is_active,
        }
    }

    fn checklist_model(schedule_id: Uuid, is_active: bool) -> checklist::Model {
        checklist::Model {
            id: Uuid::new_v4(),
            created_at: ts(0),
            updated_at: ts(0),
            schedule_id,
            is_active,
        }
    }

    #[tokio::test]
    async fn create_schedule_rejects_overlap() {
        let club_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[schedule_model(Uuid::new_v4(), club_id, true)]])
            .into_connection();
        let dao = ScheduleDao::new(&db);

        let err = dao
            .create_schedule(&club_id, details())
            .await
            .expect_err("overlap should be rejected");
        assert!(matches!(err, DaoLayerError::Conflict(_)));
    }

    #[tokio::test]
    async fn create_schedule_inserts_active_schedule() {
        let club_id = Uuid::new_v4();
        let created = schedule_model(Uuid::new_v4(), club_id, true);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<schedule::Model>::new()])
            .append_query_results([[created.clone()]])
            .into_connection();
        let dao = ScheduleDao::new(&db);

        let model = dao
            .create_schedule(&club_id, details())
            .await
            .expect("insert should succeed");
        assert_eq!(model.id, created.id);
        assert!(model.is_active);
    }

    #[tokio::test]
    async fn modify_schedule_reports_missing_schedule() {
        let missing = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<schedule::Model>::new()])
            .into_connection();
        let dao = ScheduleDao::new(&db);

        let err = dao
            .modify_schedule(&missing, details())
            .await
            .expect_err("missing schedule should fail");
        assert!(matches!(err, DaoLayerError::NotFound { id, .. } if id == missing));
    }

    #[tokio::test]
    async fn delete_if_eligible_refuses_active_checklist() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[schedule_model(id, Uuid::new_v4(), true)]])
            .append_query_results([[checklist_model(id, true)]])
            .into_connection();
        let dao = ScheduleDao::new(&db);

        let err = dao
            .delete_if_eligible(&id)
            .await
            .expect_err("active checklist should block deletion");
        assert!(matches!(err, DaoLayerError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_if_eligible_removes_schedule_without_checklist() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[schedule_model(id, Uuid::new_v4(), false)]])
            .append_query_results([Vec::<checklist::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let dao = ScheduleDao::new(&db);

        let deleted = dao.delete_if_eligible(&id).await.expect("delete should succeed");
        assert_eq!(deleted, id);
    }

    #[tokio::test]
    async fn deactivate_maps_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("select failed".to_string())])
            .into_connection();
        let dao = ScheduleDao::new(&db);

        let err = dao
            .deactivate(&Uuid::new_v4())
            .await
            .expect_err("query should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
