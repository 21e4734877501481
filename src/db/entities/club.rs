use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "clubs")]
pub struct Model {
    pub name: String,
    pub description: String,
    #[sea_orm(has_many)]
    pub schedules: HasMany<super::schedule::Entity>,
    #[sea_orm(has_many)]
    pub members: HasMany<super::club_member::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
