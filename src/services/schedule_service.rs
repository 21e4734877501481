use chrono::{DateTime, NaiveDateTime};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    db::dao::{ChecklistDao, DaoBase, ScheduleDao, ScheduleDetails},
    db::entities::{checklist, schedule},
    error::AppError,
    services::access::ClubAccess,
};

/// Raw schedule fields as submitted. Everything is optional here so that a
/// missing field is reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub spot: Option<String>,
}

impl ScheduleInput {
    pub fn validate(self) -> Result<ScheduleDetails, AppError> {
        let title = required_text("title", self.title)?;
        let content = required_text("content", self.content)?;
        let spot = required_text("spot", self.spot)?;
        let start_date = required_timestamp("start_date", self.start_date)?;
        let end_date = required_timestamp("end_date", self.end_date)?;

        if end_date < start_date {
            return Err(AppError::bad_request("end_date must not precede start_date"));
        }

        Ok(ScheduleDetails {
            title,
            content,
            start_date,
            end_date,
            spot,
        })
    }
}

fn required_text(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(AppError::bad_request(format!("{field} is required"))),
    }
}

fn required_timestamp(field: &str, value: Option<String>) -> Result<DateTimeWithTimeZone, AppError> {
    let raw = value
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| AppError::bad_request(format!("{field} is required")))?;
    parse_timestamp(raw)
        .ok_or_else(|| AppError::bad_request(format!("{field} must be an RFC 3339 timestamp")))
}

/// RFC 3339, or a local `YYYY-MM-DDTHH:MM[:SS]` taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTimeWithTimeZone> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

/// A schedule together with its checklist and derived deletion eligibility.
#[derive(Debug, Clone)]
pub struct ScheduleView {
    pub schedule: schedule::Model,
    pub checklist: Option<checklist::Model>,
    pub can_delete: bool,
}

impl ScheduleView {
    fn new(schedule: schedule::Model, checklist: Option<checklist::Model>) -> Self {
        let can_delete = schedule.can_delete(checklist.as_ref());
        Self {
            schedule,
            checklist,
            can_delete,
        }
    }
}

#[derive(Clone)]
pub struct ScheduleService {
    schedule_dao: ScheduleDao,
    checklist_dao: ChecklistDao,
    access: ClubAccess,
}

impl ScheduleService {
    pub fn new(schedule_dao: ScheduleDao, checklist_dao: ChecklistDao, access: ClubAccess) -> Self {
        Self {
            schedule_dao,
            checklist_dao,
            access,
        }
    }

    pub async fn create(
        &self,
        actor: &Uuid,
        club_id: &Uuid,
        input: ScheduleInput,
    ) -> Result<schedule::Model, AppError> {
        let details = input.validate()?;
        self.access.leader(club_id, actor).await?;

        let created = self
            .schedule_dao
            .create_schedule(club_id, details)
            .await
            .inspect_err(|err| tracing::warn!(%club_id, error = %err, "schedule rejected"))?;
        tracing::info!(schedule_id = %created.id, %club_id, "schedule created");
        Ok(created)
    }

    pub async fn modify(
        &self,
        actor: &Uuid,
        id: &Uuid,
        input: ScheduleInput,
    ) -> Result<schedule::Model, AppError> {
        let details = input.validate()?;
        let current = self.schedule_dao.find_by_id(*id).await?;
        self.access.leader(&current.club_id, actor).await?;

        Ok(self.schedule_dao.modify_schedule(id, details).await?)
    }

    pub async fn get(&self, actor: &Uuid, id: &Uuid) -> Result<ScheduleView, AppError> {
        let schedule = self.schedule_dao.find_by_id(*id).await?;
        self.access.membership(&schedule.club_id, actor).await?;

        let checklist = self.schedule_dao.checklist_of(id).await?;
        Ok(ScheduleView::new(schedule, checklist))
    }

    pub async fn deactivate(&self, actor: &Uuid, id: &Uuid) -> Result<ScheduleView, AppError> {
        let schedule = self.schedule_dao.find_by_id(*id).await?;
        self.access.leader(&schedule.club_id, actor).await?;

        let schedule = if schedule.is_active {
            let updated = self.schedule_dao.deactivate(id).await?;
            tracing::info!(schedule_id = %id, "schedule deactivated");
            updated
        } else {
            schedule
        };
        let checklist = self.schedule_dao.checklist_of(id).await?;
        Ok(ScheduleView::new(schedule, checklist))
    }

    pub async fn delete(&self, actor: &Uuid, id: &Uuid) -> Result<(), AppError> {
        let schedule = self.schedule_dao.find_by_id(*id).await?;
        self.access.leader(&schedule.club_id, actor).await?;

        self.schedule_dao
            .delete_if_eligible(id)
            .await
            .inspect_err(|err| tracing::warn!(schedule_id = %id, error = %err, "delete refused"))?;
        tracing::info!(schedule_id = %id, "schedule deleted");
        Ok(())
    }

    /// Attaches a new active checklist. Any current checklist must already be
    /// inactive and is discarded.
    pub async fn attach_checklist(
        &self,
        actor: &Uuid,
        id: &Uuid,
    ) -> Result<checklist::Model, AppError> {
        let schedule = self.schedule_dao.find_by_id(*id).await?;
        self.access.leader(&schedule.club_id, actor).await?;

        let attached = self
            .checklist_dao
            .replace_for_schedule(id, true)
            .await?
            .ok_or_else(|| AppError::internal("Checklist was not attached"))?;
        tracing::info!(schedule_id = %id, checklist_id = %attached.id, "checklist attached");
        Ok(attached)
    }

    pub async fn clear_checklist(&self, actor: &Uuid, id: &Uuid) -> Result<(), AppError> {
        let schedule = self.schedule_dao.find_by_id(*id).await?;
        self.access.leader(&schedule.club_id, actor).await?;

        self.checklist_dao.replace_for_schedule(id, false).await?;
        tracing::info!(schedule_id = %id, "checklist cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::{ScheduleInput, parse_timestamp};

    fn hiking() -> ScheduleInput {
        ScheduleInput {
            title: Some("Hiking".to_string()),
            content: Some("Trail meetup".to_string()),
            start_date: Some("2025-06-01T09:00".to_string()),
            end_date: Some("2025-06-01T17:00".to_string()),
            spot: Some("Trailhead".to_string()),
        }
    }

    #[test]
    fn valid_input_is_trimmed_and_parsed() {
        let details = ScheduleInput {
            title: Some("  Hiking ".to_string()),
            ..hiking()
        }
        .validate()
        .expect("input should validate");

        assert_eq!(details.title, "Hiking");
        assert_eq!(details.start_date.to_rfc3339(), "2025-06-01T09:00:00+00:00");
        assert_eq!(details.end_date.to_rfc3339(), "2025-06-01T17:00:00+00:00");
    }

    #[test]
    fn blank_or_missing_fields_are_rejected() {
        let blank_spot = ScheduleInput {
            spot: Some("   ".to_string()),
            ..hiking()
        };
        let err = blank_spot.validate().expect_err("blank spot should fail");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "spot is required");

        let no_start = ScheduleInput {
            start_date: None,
            ..hiking()
        };
        let err = no_start.validate().expect_err("missing start should fail");
        assert_eq!(err.message(), "start_date is required");
    }

    #[test]
    fn end_before_start_is_rejected() {
        let reversed = ScheduleInput {
            start_date: Some("2025-06-01T17:00:00Z".to_string()),
            end_date: Some("2025-06-01T09:00:00Z".to_string()),
            ..hiking()
        };
        let err = reversed.validate().expect_err("reversed range should fail");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn zero_length_range_is_allowed() {
        let instant = ScheduleInput {
            end_date: Some("2025-06-01T09:00".to_string()),
            ..hiking()
        };
        instant.validate().expect("equal start and end should validate");
    }

    #[test]
    fn timestamps_accept_offsets_and_reject_garbage() {
        let with_offset = parse_timestamp("2025-06-01T09:00:00+02:00").expect("rfc3339 parses");
        assert_eq!(with_offset.offset().local_minus_utc(), 2 * 3600);

        assert!(parse_timestamp("2025-06-01T09:00:30").is_some());
        assert!(parse_timestamp("next tuesday").is_none());

        let err = ScheduleInput {
            end_date: Some("tomorrow".to_string()),
            ..hiking()
        }
        .validate()
        .expect_err("garbage timestamp should fail");
        assert!(err.message().contains("end_date"));
    }
}
