use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, HasIdActiveModel, stamp_new};
use crate::db::entities::{member, prelude::Member};

const EMAIL_TAKEN: &str = "Email is already registered to another member";

#[derive(Clone)]
pub struct MemberDao {
    db: DatabaseConnection,
}

impl DaoBase for MemberDao {
    type Entity = Member;
    const ENTITY_NAME: &'static str = "member";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl MemberDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<member::Model>> {
        Member::find()
            .filter(member::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    /// Creates the member under `id` (the token subject), or refreshes name
    /// and email when the id is already known.
    pub async fn upsert_profile(
        &self,
        id: &Uuid,
        name: &str,
        email: &str,
    ) -> DaoResult<member::Model> {
        if self.find_optional(*id).await?.is_some() {
            let name = name.to_string();
            let email = email.to_string();
            return self
                .update(*id, move |active| {
                    active.name = Set(name);
                    active.email = Set(email);
                })
                .await
                .map_err(|err| match err {
                    DaoLayerError::Db(db_err) => DaoLayerError::from_write(db_err, EMAIL_TAKEN),
                    other => other,
                });
        }

        let mut active = member::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            ..Default::default()
        };
        stamp_new(&mut active);
        active.set_id(*id);
        active
            .insert(&self.db)
            .await
            .map_err(|err| DaoLayerError::from_write(err, EMAIL_TAKEN))
    }
}
