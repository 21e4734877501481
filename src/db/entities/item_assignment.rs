use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

/// A club member's responsibility for one checklist item. The composite
/// unique key is the only guard against assigning the same pair twice;
/// inserts that violate it surface as conflicts.
///
/// Compare assignments with [`Identified::same_entity`], not `==`.
///
/// [`Identified::same_entity`]: crate::db::dao::Identified::same_entity
#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "item_assignments")]
pub struct Model {
    #[sea_orm(unique_key = "member_item")]
    pub club_member_id: Uuid,
    #[sea_orm(unique_key = "member_item")]
    pub checklist_item_id: Uuid,
    #[sea_orm(default_value = false)]
    pub is_checked: bool,
    #[sea_orm(belongs_to, from = "club_member_id", to = "id", on_delete = "Cascade")]
    pub club_member: HasOne<super::club_member::Entity>,
    #[sea_orm(belongs_to, from = "checklist_item_id", to = "id", on_delete = "Cascade")]
    pub checklist_item: HasOne<super::checklist_item::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
