use uuid::Uuid;

use crate::{
    db::dao::{AssignmentDao, ChecklistDao, ClubDao, DaoBase, Identified},
    db::entities::{checklist, checklist_item, club_member, item_assignment, schedule},
    error::AppError,
    services::access::ClubAccess,
};

/// An assignment with the assignee's display name.
#[derive(Debug, Clone)]
pub struct AssignmentView {
    pub assignment: item_assignment::Model,
    pub club_member_name: String,
}

impl AssignmentView {
    fn new(assignment: item_assignment::Model, member: &club_member::Model) -> Self {
        Self {
            club_member_name: member.display_name.clone(),
            assignment,
        }
    }

    /// Builds the view from a membership join. A missing membership means the
    /// assignment row points at nothing.
    fn joined(
        assignment: item_assignment::Model,
        member: Option<club_member::Model>,
    ) -> Result<Self, AppError> {
        let member = assignee_of(&assignment, member)?;
        Ok(Self::new(assignment, &member))
    }
}

fn assignee_of(
    assignment: &item_assignment::Model,
    member: Option<club_member::Model>,
) -> Result<club_member::Model, AppError> {
    member.ok_or_else(|| {
        tracing::error!(
            assignment_id = %assignment.id,
            club_member_id = %assignment.club_member_id,
            "assignment references a missing club member"
        );
        AppError::internal("Assignment has no club member")
    })
}

#[derive(Clone)]
pub struct ChecklistService {
    checklist_dao: ChecklistDao,
    assignment_dao: AssignmentDao,
    club_dao: ClubDao,
    access: ClubAccess,
}

impl ChecklistService {
    pub fn new(
        checklist_dao: ChecklistDao,
        assignment_dao: AssignmentDao,
        club_dao: ClubDao,
        access: ClubAccess,
    ) -> Self {
        Self {
            checklist_dao,
            assignment_dao,
            club_dao,
            access,
        }
    }

    async fn require_active(
        &self,
        id: &Uuid,
    ) -> Result<(checklist::Model, schedule::Model), AppError> {
        self.checklist_dao
            .find_active_with_schedule(id)
            .await?
            .ok_or_else(|| AppError::not_found("Active checklist not found"))
    }

    /// Schedule owning the checklist that holds `item`.
    async fn schedule_of_item(
        &self,
        item: &checklist_item::Model,
    ) -> Result<schedule::Model, AppError> {
        let (_, schedule) = self
            .checklist_dao
            .find_with_schedule(&item.checklist_id)
            .await?;
        Ok(schedule)
    }

    pub async fn get_active(
        &self,
        actor: &Uuid,
        id: &Uuid,
    ) -> Result<(checklist::Model, schedule::Model), AppError> {
        let (checklist, schedule) = self.require_active(id).await?;
        self.access.membership(&schedule.club_id, actor).await?;
        Ok((checklist, schedule))
    }

    pub async fn deactivate(&self, actor: &Uuid, id: &Uuid) -> Result<checklist::Model, AppError> {
        let (checklist, schedule) = self.checklist_dao.find_with_schedule(id).await?;
        self.access.leader(&schedule.club_id, actor).await?;

        if !checklist.is_active {
            return Ok(checklist);
        }
        let updated = self.checklist_dao.deactivate(id).await?;
        tracing::info!(checklist_id = %id, schedule_id = %schedule.id, "checklist deactivated");
        Ok(updated)
    }

    pub async fn add_item(
        &self,
        actor: &Uuid,
        checklist_id: &Uuid,
        description: &str,
    ) -> Result<checklist_item::Model, AppError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::bad_request("Description required"));
        }
        let (_, schedule) = self.require_active(checklist_id).await?;
        self.access.leader(&schedule.club_id, actor).await?;

        Ok(self
            .checklist_dao
            .create_item(checklist_id, description)
            .await?)
    }

    pub async fn list_items(
        &self,
        actor: &Uuid,
        checklist_id: &Uuid,
    ) -> Result<Vec<checklist_item::Model>, AppError> {
        let (_, schedule) = self.checklist_dao.find_with_schedule(checklist_id).await?;
        self.access.membership(&schedule.club_id, actor).await?;

        Ok(self.checklist_dao.list_items(checklist_id).await?)
    }

    pub async fn remove_item(
        &self,
        actor: &Uuid,
        checklist_id: &Uuid,
        item_id: &Uuid,
    ) -> Result<(), AppError> {
        let (_, schedule) = self.checklist_dao.find_with_schedule(checklist_id).await?;
        self.access.leader(&schedule.club_id, actor).await?;

        if !self.checklist_dao.delete_item(checklist_id, item_id).await? {
            return Err(AppError::not_found("Checklist item not found"));
        }
        Ok(())
    }

    /// Assigns `club_member_id` to the item. The item's checklist must be
    /// active and the membership must belong to the schedule's club. Duplicate
    /// pairs are rejected by storage and come back as a conflict.
    pub async fn assign(
        &self,
        actor: &Uuid,
        item_id: &Uuid,
        club_member_id: &Uuid,
        is_checked: bool,
    ) -> Result<AssignmentView, AppError> {
        let item = self.checklist_dao.find_item(item_id).await?;
        let (_, schedule) = self.require_active(&item.checklist_id).await?;
        self.access.leader(&schedule.club_id, actor).await?;

        let assignee = self.club_dao.find_membership_by_id(club_member_id).await?;
        if assignee.club_id != schedule.club_id {
            return Err(AppError::bad_request(
                "Club member does not belong to this club",
            ));
        }

        let assignment = self
            .assignment_dao
            .assign(club_member_id, item_id, is_checked)
            .await
            .inspect_err(|err| {
                tracing::warn!(%item_id, %club_member_id, error = %err, "assignment rejected")
            })?;
        tracing::info!(assignment_id = %assignment.id, %item_id, "item assigned");
        Ok(AssignmentView::new(assignment, &assignee))
    }

    pub async fn list_assignments(
        &self,
        actor: &Uuid,
        item_id: &Uuid,
    ) -> Result<Vec<AssignmentView>, AppError> {
        let item = self.checklist_dao.find_item(item_id).await?;
        let schedule = self.schedule_of_item(&item).await?;
        self.access.membership(&schedule.club_id, actor).await?;

        let rows = self.assignment_dao.list_for_item(item_id).await?;
        rows.into_iter()
            .map(|(assignment, member)| AssignmentView::joined(assignment, member))
            .collect()
    }

    /// Sets the completion flag. Allowed for the assignee and club leaders.
    pub async fn toggle(
        &self,
        actor: &Uuid,
        assignment_id: &Uuid,
        is_checked: bool,
    ) -> Result<AssignmentView, AppError> {
        let (assignment, assignee) = self.assignment_dao.find_with_member(assignment_id).await?;
        let assignee = assignee_of(&assignment, assignee)?;
        let item = self
            .checklist_dao
            .find_item(&assignment.checklist_item_id)
            .await?;
        let schedule = self.schedule_of_item(&item).await?;

        let acting = self.access.membership(&schedule.club_id, actor).await?;
        if !assignee.same_entity(&acting) && !acting.is_leader() {
            return Err(AppError::forbidden(
                "Only the assignee or a club leader may update this assignment",
            ));
        }

        let updated = self
            .assignment_dao
            .set_checked(assignment_id, is_checked)
            .await?;
        Ok(AssignmentView::new(updated, &assignee))
    }

    pub async fn unassign(&self, actor: &Uuid, assignment_id: &Uuid) -> Result<(), AppError> {
        let assignment = self.assignment_dao.find_by_id(*assignment_id).await?;
        let item = self
            .checklist_dao
            .find_item(&assignment.checklist_item_id)
            .await?;
        let schedule = self.schedule_of_item(&item).await?;
        self.access.leader(&schedule.club_id, actor).await?;

        self.assignment_dao.delete(*assignment_id).await?;
        Ok(())
    }
}
