use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Order,
    QueryFilter, QuerySelect, QueryTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, stamp_new};
use crate::db::entities::prelude::{Checklist, ChecklistItem, ItemAssignment, Schedule};
use crate::db::entities::{checklist, checklist_item, item_assignment, schedule};

#[derive(Clone)]
pub struct ChecklistDao {
    db: DatabaseConnection,
}

impl DaoBase for ChecklistDao {
    type Entity = Checklist;
    const ENTITY_NAME: &'static str = "checklist";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Clone)]
struct ChecklistItemDao {
    db: DatabaseConnection,
}

impl DaoBase for ChecklistItemDao {
    type Entity = ChecklistItem;
    const ENTITY_NAME: &'static str = "checklist item";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ChecklistDao {
    fn item_dao(&self) -> ChecklistItemDao {
        ChecklistItemDao::new(&self.db)
    }

    /// Active checklist plus its schedule, fetched with a single joined query.
    /// Inactive and unknown ids both yield `None`.
    pub async fn find_active_with_schedule(
        &self,
        id: &Uuid,
    ) -> DaoResult<Option<(checklist::Model, schedule::Model)>> {
        let row = Checklist::find_by_id(*id)
            .filter(checklist::Column::IsActive.eq(true))
            .find_also_related(Schedule)
            .one(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;

        Ok(row.and_then(|(checklist, schedule)| schedule.map(|schedule| (checklist, schedule))))
    }

    /// Checklist in any state with its owning schedule.
    pub async fn find_with_schedule(
        &self,
        id: &Uuid,
    ) -> DaoResult<(checklist::Model, schedule::Model)> {
        let row = Checklist::find_by_id(*id)
            .find_also_related(Schedule)
            .one(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;

        match row {
            Some((checklist, Some(schedule))) => Ok((checklist, schedule)),
            _ => Err(Self::not_found(*id)),
        }
    }

    pub async fn find_by_schedule(&self, schedule_id: &Uuid) -> DaoResult<Option<checklist::Model>> {
        find_for_schedule(&self.db, schedule_id).await
    }

    /// Swaps the schedule's checklist. A current checklist must already be
    /// inactive; it is deleted together with its items and assignments. With
    /// `attach` a fresh active checklist takes its place.
    pub async fn replace_for_schedule(
        &self,
        schedule_id: &Uuid,
        attach: bool,
    ) -> DaoResult<Option<checklist::Model>> {
        let txn = self.db.begin().await.map_err(DaoLayerError::Db)?;

        Schedule::find_by_id(*schedule_id)
            .one(&txn)
            .await
            .map_err(DaoLayerError::Db)?
            .ok_or(DaoLayerError::NotFound {
                entity: "schedule",
                id: *schedule_id,
            })?;

        if let Some(current) = find_for_schedule(&txn, schedule_id).await? {
            if current.is_active {
                return Err(DaoLayerError::Conflict(
                    "Schedule already has an active checklist; deactivate it first".to_string(),
                ));
            }
            purge_checklist(&txn, &current.id).await?;
        }

        let attached = if attach {
            let mut active = checklist::ActiveModel {
                schedule_id: Set(*schedule_id),
                is_active: Set(true),
                ..Default::default()
            };
            stamp_new(&mut active);
            let model = active.insert(&txn).await.map_err(|err| {
                DaoLayerError::from_write(err, "Schedule already has a checklist")
            })?;
            Some(model)
        } else {
            None
        };

        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(attached)
    }

    pub async fn deactivate(&self, id: &Uuid) -> DaoResult<checklist::Model> {
        self.update(*id, |active| {
            active.is_active = Set(false);
        })
        .await
    }

    pub async fn create_item(
        &self,
        checklist_id: &Uuid,
        description: &str,
    ) -> DaoResult<checklist_item::Model> {
        let model = checklist_item::ActiveModel {
            checklist_id: Set(*checklist_id),
            description: Set(description.to_string()),
            ..Default::default()
        };
        self.item_dao().create(model).await
    }

    pub async fn list_items(&self, checklist_id: &Uuid) -> DaoResult<Vec<checklist_item::Model>> {
        let checklist_id = *checklist_id;
        self.item_dao()
            .find_iter(
                None,
                Some((checklist_item::Column::CreatedAt, Order::Asc)),
                move |query| query.filter(checklist_item::Column::ChecklistId.eq(checklist_id)),
            )
            .collect_all()
            .await
    }

    pub async fn find_item(&self, item_id: &Uuid) -> DaoResult<checklist_item::Model> {
        self.item_dao().find_by_id(*item_id).await
    }

    /// Deletes the item and every assignment of it. Returns `false` when the
    /// item does not belong to `checklist_id`.
    pub async fn delete_item(&self, checklist_id: &Uuid, item_id: &Uuid) -> DaoResult<bool> {
        let txn = self.db.begin().await.map_err(DaoLayerError::Db)?;

        let item = ChecklistItem::find_by_id(*item_id)
            .filter(checklist_item::Column::ChecklistId.eq(*checklist_id))
            .one(&txn)
            .await
            .map_err(DaoLayerError::Db)?;
        let Some(item) = item else {
            return Ok(false);
        };

        ItemAssignment::delete_many()
            .filter(item_assignment::Column::ChecklistItemId.eq(item.id))
            .exec(&txn)
            .await
            .map_err(DaoLayerError::Db)?;
        ChecklistItem::delete_by_id(item.id)
            .exec(&txn)
            .await
            .map_err(DaoLayerError::Db)?;

        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(true)
    }
}

pub(crate) async fn find_for_schedule<C: ConnectionTrait>(
    conn: &C,
    schedule_id: &Uuid,
) -> DaoResult<Option<checklist::Model>> {
    Checklist::find()
        .filter(checklist::Column::ScheduleId.eq(*schedule_id))
        .one(conn)
        .await
        .map_err(DaoLayerError::Db)
}

/// Removes a checklist with its items and their assignments, children first.
pub(crate) async fn purge_checklist<C: ConnectionTrait>(
    conn: &C,
    checklist_id: &Uuid,
) -> DaoResult<()> {
    let item_ids = ChecklistItem::find()
        .select_only()
        .column(checklist_item::Column::Id)
        .filter(checklist_item::Column::ChecklistId.eq(*checklist_id))
        .into_query();

    ItemAssignment::delete_many()
        .filter(item_assignment::Column::ChecklistItemId.in_subquery(item_ids))
        .exec(conn)
        .await
        .map_err(DaoLayerError::Db)?;
    ChecklistItem::delete_many()
        .filter(checklist_item::Column::ChecklistId.eq(*checklist_id))
        .exec(conn)
        .await
        .map_err(DaoLayerError::Db)?;
    Checklist::delete_by_id(*checklist_id)
        .exec(conn)
        .await
        .map_err(DaoLayerError::Db)?;

    tracing::debug!(%checklist_id, "checklist purged");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::ChecklistDao;
    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::db::entities::{checklist, checklist_item, schedule};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn schedule_model(id: Uuid) -> schedule::Model {
        schedule::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            club_id: Uuid::new_v4(),
            title: "Hiking".to_string(),
            content: "Trail meetup".to_string(),
            start_date: ts(),
            end_date: ts(),
            spot: "Trailhead".to_string(),
            is_active: true,
        }
    }

    fn checklist_model(schedule_id: Uuid, is_active: bool) -> checklist::Model {
        checklist::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            schedule_id,
            is_active,
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn replace_refuses_while_current_checklist_is_active() {
        let schedule_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[schedule_model(schedule_id)]])
            .append_query_results([[checklist_model(schedule_id, true)]])
            .into_connection();
        let dao = ChecklistDao::new(&db);

        let err = dao
            .replace_for_schedule(&schedule_id, true)
            .await
            .expect_err("active checklist should not be replaced");
        assert!(matches!(err, DaoLayerError::Conflict(_)));
    }

    #[tokio::test]
    async fn replace_reports_unknown_schedule() {
        let schedule_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<schedule::Model>::new()])
            .into_connection();
        let dao = ChecklistDao::new(&db);

        let err = dao
            .replace_for_schedule(&schedule_id, true)
            .await
            .expect_err("unknown schedule should fail");
        assert!(matches!(
            err,
            DaoLayerError::NotFound { entity: "schedule", id } if id == schedule_id
        ));
    }

    #[tokio::test]
    async fn clearing_an_inactive_checklist_purges_it() {
        let schedule_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[schedule_model(schedule_id)]])
            .append_query_results([[checklist_model(schedule_id, false)]])
            .append_exec_results([exec(2), exec(1), exec(1)])
            .into_connection();
        let dao = ChecklistDao::new(&db);

        let attached = dao
            .replace_for_schedule(&schedule_id, false)
            .await
            .expect("clearing should succeed");
        assert!(attached.is_none());
    }

    #[tokio::test]
    async fn delete_item_returns_false_for_foreign_item() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<checklist_item::Model>::new()])
            .into_connection();
        let dao = ChecklistDao::new(&db);

        let deleted = dao
            .delete_item(&Uuid::new_v4(), &Uuid::new_v4())
            .await
            .expect("query should succeed");
        assert!(!deleted);
    }
}
