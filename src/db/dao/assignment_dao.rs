use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::prelude::{ClubMember, ItemAssignment};
use crate::db::entities::{club_member, item_assignment};

const DUPLICATE_MESSAGE: &str = "Club member is already assigned to this checklist item";

#[derive(Clone)]
pub struct AssignmentDao {
    db: DatabaseConnection,
}

impl DaoBase for AssignmentDao {
    type Entity = ItemAssignment;
    const ENTITY_NAME: &'static str = "assignment";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AssignmentDao {
    /// Relies on the (club member, item) unique key; a second insert of the
    /// same pair comes back as `Conflict`.
    pub async fn assign(
        &self,
        club_member_id: &Uuid,
        checklist_item_id: &Uuid,
        is_checked: bool,
    ) -> DaoResult<item_assignment::Model> {
        let model = item_assignment::ActiveModel {
            club_member_id: Set(*club_member_id),
            checklist_item_id: Set(*checklist_item_id),
            is_checked: Set(is_checked),
            ..Default::default()
        };

        match self.create(model).await {
            Ok(created) => Ok(created),
            Err(DaoLayerError::Db(err)) => Err(DaoLayerError::from_write(err, DUPLICATE_MESSAGE)),
            Err(other) => Err(other),
        }
    }

    pub async fn list_for_item(
        &self,
        checklist_item_id: &Uuid,
    ) -> DaoResult<Vec<(item_assignment::Model, Option<club_member::Model>)>> {
        ItemAssignment::find()
            .filter(item_assignment::Column::ChecklistItemId.eq(*checklist_item_id))
            .order_by_asc(item_assignment::Column::CreatedAt)
            .find_also_related(ClubMember)
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn find_with_member(
        &self,
        id: &Uuid,
    ) -> DaoResult<(item_assignment::Model, Option<club_member::Model>)> {
        ItemAssignment::find_by_id(*id)
            .find_also_related(ClubMember)
            .one(&self.db)
            .await
            .map_err(DaoLayerError::Db)?
            .ok_or_else(|| Self::not_found(*id))
    }

    pub async fn set_checked(
        &self,
        id: &Uuid,
        is_checked: bool,
    ) -> DaoResult<item_assignment::Model> {
        self.update(*id, |active| {
            active.is_checked = Set(is_checked);
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::AssignmentDao;
    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::db::entities::item_assignment;

    #[tokio::test]
    async fn set_checked_reports_missing_assignment() {
        let missing = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<item_assignment::Model>::new()])
            .into_connection();
        let dao = AssignmentDao::new(&db);

        let err = dao
            .set_checked(&missing, true)
            .await
            .expect_err("missing assignment should fail");
        assert!(matches!(
            err,
            DaoLayerError::NotFound { entity: "assignment", id } if id == missing
        ));
    }

    #[tokio::test]
    async fn delete_reports_missing_assignment() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let dao = AssignmentDao::new(&db);

        let err = dao
            .delete(Uuid::new_v4())
            .await
            .expect_err("nothing to delete");
        assert!(matches!(err, DaoLayerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn assign_keeps_unrelated_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("insert failed".to_string())])
            .into_connection();
        let dao = AssignmentDao::new(&db);

        let err = dao
            .assign(&Uuid::new_v4(), &Uuid::new_v4(), false)
            .await
            .expect_err("insert should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
