use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A member's participation in one club. A member joins a club at most once.
#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "club_members")]
pub struct Model {
    #[sea_orm(unique_key = "club_member")]
    pub club_id: Uuid,
    #[sea_orm(unique_key = "club_member")]
    pub member_id: Uuid,
    pub display_name: String,
    pub role: String,
    #[sea_orm(belongs_to, from = "club_id", to = "id", on_delete = "Cascade")]
    pub club: HasOne<super::club::Entity>,
    #[sea_orm(belongs_to, from = "member_id", to = "id", on_delete = "Cascade")]
    pub member: HasOne<super::member::Entity>,
    #[sea_orm(has_many)]
    pub assignments: HasMany<super::item_assignment::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn club_role(&self) -> ClubRole {
        ClubRole::try_from(self.role.as_str()).unwrap_or(ClubRole::Member)
    }

    pub fn is_leader(&self) -> bool {
        self.club_role() == ClubRole::Leader
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClubRole {
    Leader,
    #[default]
    Member,
}

impl ClubRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClubRole::Leader => "leader",
            ClubRole::Member => "member",
        }
    }
}

impl TryFrom<&str> for ClubRole {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "leader" => Ok(ClubRole::Leader),
            "member" => Ok(ClubRole::Member),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClubRole;

    #[test]
    fn role_string_roundtrip() {
        assert_eq!(ClubRole::Leader.as_str(), "leader");
        assert_eq!(ClubRole::Member.as_str(), "member");

        assert_eq!(ClubRole::try_from("leader"), Ok(ClubRole::Leader));
        assert_eq!(ClubRole::try_from("member"), Ok(ClubRole::Member));
        assert!(ClubRole::try_from("owner").is_err());
    }
}
