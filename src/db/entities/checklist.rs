use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

/// The one checklist a schedule may own. The checklist holds the link, and
/// `schedule_id` is unique so a schedule never has two.
#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "checklists")]
pub struct Model {
    #[sea_orm(unique)]
    pub schedule_id: Uuid,
    #[sea_orm(default_value = true)]
    pub is_active: bool,
    #[sea_orm(belongs_to, from = "schedule_id", to = "id", on_delete = "Cascade")]
    pub schedule: HasOne<super::schedule::Entity>,
    #[sea_orm(has_many)]
    pub items: HasMany<super::checklist_item::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
