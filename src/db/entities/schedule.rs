use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

/// A club event. `club_id` is fixed at creation; `is_active` only ever moves
/// from true to false.
#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(indexed)]
    pub club_id: Uuid,
    pub title: String,
    pub content: String,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    pub spot: String,
    #[sea_orm(default_value = true)]
    pub is_active: bool,
    #[sea_orm(belongs_to, from = "club_id", to = "id", on_delete = "Cascade")]
    pub club: HasOne<super::club::Entity>,
    #[sea_orm(has_one)]
    pub checklist: HasOne<super::checklist::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Eligible for hard deletion when there is no checklist or it has been
    /// deactivated.
    pub fn can_delete(&self, checklist: Option<&super::checklist::Model>) -> bool {
        checklist.is_none_or(|checklist| !checklist.is_active)
    }

    /// Half-open overlap: back-to-back events do not collide.
    pub fn overlaps(&self, start: &DateTimeWithTimeZone, end: &DateTimeWithTimeZone) -> bool {
        self.start_date < *end && *start < self.end_date
    }
}
