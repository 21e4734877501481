use uuid::Uuid;

use crate::{
    db::dao::{DaoBase, MemberDao},
    db::entities::member,
    error::AppError,
};

#[derive(Clone)]
pub struct MemberService {
    member_dao: MemberDao,
}

impl MemberService {
    pub fn new(member_dao: MemberDao) -> Self {
        Self { member_dao }
    }

    pub async fn upsert_profile(
        &self,
        actor: &Uuid,
        name: &str,
        email: &str,
    ) -> Result<member::Model, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Name required"));
        }
        let email = normalize_email(email)?;

        let profile = self.member_dao.upsert_profile(actor, name, &email).await?;
        tracing::debug!(member_id = %profile.id, "profile saved");
        Ok(profile)
    }

    pub async fn get_profile(&self, actor: &Uuid) -> Result<member::Model, AppError> {
        Ok(self.member_dao.find_by_id(*actor).await?)
    }
}

fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_ascii_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::bad_request("Valid email required"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::normalize_email;

    #[test]
    fn email_is_lowercased_and_checked() {
        assert_eq!(
            normalize_email(" Alice@Example.COM ").expect("email should be valid"),
            "alice@example.com"
        );
        assert!(normalize_email("alice").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("alice@localhost").is_err());
    }
}
