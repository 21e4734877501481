pub trait HasCreatedAtColumn: sea_orm::EntityTrait {
    fn created_at_column() -> Self::Column;
}

pub trait HasIdActiveModel {
    fn set_id(&mut self, id: uuid::Uuid);
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone);
}

/// Identity of a record as stored. Values that were never read back from the
/// database have no identity and are distinct from everything, themselves
/// included.
pub trait Identified {
    fn persisted_id(&self) -> Option<uuid::Uuid>;

    fn same_entity<O: Identified + ?Sized>(&self, other: &O) -> bool {
        match (self.persisted_id(), other.persisted_id()) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }
}
