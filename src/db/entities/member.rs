use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

/// A person known to the identity collaborator. Access tokens carry this id.
#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(has_many)]
    pub memberships: HasMany<super::club_member::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
