use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "checklist_items")]
pub struct Model {
    #[sea_orm(indexed)]
    pub checklist_id: Uuid,
    pub description: String,
    #[sea_orm(belongs_to, from = "checklist_id", to = "id", on_delete = "Cascade")]
    pub checklist: HasOne<super::checklist::Entity>,
    #[sea_orm(has_many)]
    pub assignments: HasMany<super::item_assignment::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
