#[allow(unused_imports)]
pub mod prelude {
    pub use super::checklist::Entity as Checklist;
    pub use super::checklist_item::Entity as ChecklistItem;
    pub use super::club::Entity as Club;
    pub use super::club_member::Entity as ClubMember;
    pub use super::item_assignment::Entity as ItemAssignment;
    pub use super::member::Entity as Member;
    pub use super::schedule::Entity as Schedule;
}

pub mod checklist;
pub mod checklist_item;
pub mod club;
pub mod club_member;
pub mod item_assignment;
pub mod member;
pub mod schedule;
