use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, Order, PrimaryKeyTrait, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use super::base_traits::{HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel};
use super::error::{DaoLayerError, DaoResult};

type ModelOf<D> = <<D as DaoBase>::Entity as EntityTrait>::Model;
type ColumnOf<D> = <<D as DaoBase>::Entity as EntityTrait>::Column;

/// A validated 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64, max_page_size: u64) -> DaoResult<Self> {
        if page == 0 || page_size == 0 || page_size > max_page_size {
            return Err(DaoLayerError::InvalidPagination { page, page_size });
        }
        Ok(Self { page, page_size })
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// One row past the page, so the caller can tell whether more follow.
    fn probe_limit(&self) -> u64 {
        self.page_size.saturating_add(1)
    }

    fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub has_next: bool,
}

impl<T> PaginatedResponse<T> {
    fn from_probe(mut rows: Vec<T>, request: PageRequest) -> Self {
        let has_next = rows.len() as u64 > request.page_size;
        rows.truncate(request.page_size as usize);
        Self {
            data: rows,
            page: request.page,
            page_size: request.page_size,
            has_next,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            has_next: self.has_next,
        }
    }
}

/// Walks a filtered query page by page until a short page comes back.
pub struct DaoPager<D, F>
where
    D: DaoBase,
    F: Fn(Select<D::Entity>) -> Select<D::Entity> + Clone + Send,
{
    dao: D,
    next: Option<PageRequest>,
    order: Option<(ColumnOf<D>, Order)>,
    apply: F,
}

impl<D, F> DaoPager<D, F>
where
    D: DaoBase,
    F: Fn(Select<D::Entity>) -> Select<D::Entity> + Clone + Send,
    ColumnOf<D>: Clone,
{
    pub async fn next_page(&mut self) -> DaoResult<Option<PaginatedResponse<ModelOf<D>>>> {
        let Some(request) = self.next.take() else {
            return Ok(None);
        };

        let response = self
            .dao
            .find(
                request.page,
                request.page_size,
                self.order.clone(),
                self.apply.clone(),
            )
            .await?;
        if response.has_next {
            self.next = Some(request.next());
        }
        Ok(Some(response))
    }

    pub async fn collect_all(mut self) -> DaoResult<Vec<ModelOf<D>>> {
        let mut rows = Vec::new();
        while let Some(page) = self.next_page().await? {
            rows.extend(page.data);
        }
        Ok(rows)
    }
}

/// Fills the columns `#[base_entity]` injects before a row is inserted.
pub fn stamp_new<A>(active: &mut A)
where
    A: HasIdActiveModel + TimestampedActiveModel,
{
    let now = Utc::now().fixed_offset();
    active.set_id(Uuid::new_v4());
    active.set_created_at(now);
    active.set_updated_at(now);
}

/// Shared row operations for a single entity. Implementors only provide the
/// connection; domain DAOs add their own queries on top.
#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model:
        FromQueryResult + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + HasIdActiveModel
        + TimestampedActiveModel
        + Send,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<Uuid> + Send + Sync,
    Self::Entity: HasCreatedAtColumn,
{
    type Entity: EntityTrait + Send + Sync;
    /// Name used in not-found messages.
    const ENTITY_NAME: &'static str;
    const MAX_PAGE_SIZE: u64 = 100;

    fn from_db(db: DatabaseConnection) -> Self;

    fn new(db: &DatabaseConnection) -> Self {
        Self::from_db(db.clone())
    }

    fn db(&self) -> &DatabaseConnection;

    fn not_found(id: Uuid) -> DaoLayerError {
        DaoLayerError::NotFound {
            entity: Self::ENTITY_NAME,
            id,
        }
    }

    async fn create(
        &self,
        data: impl IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send,
    ) -> DaoResult<ModelOf<Self>> {
        let mut active = data.into_active_model();
        stamp_new(&mut active);
        active.insert(self.db()).await.map_err(DaoLayerError::Db)
    }

    async fn find_optional(&self, id: Uuid) -> DaoResult<Option<ModelOf<Self>>> {
        Self::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn find_by_id(&self, id: Uuid) -> DaoResult<ModelOf<Self>> {
        self.find_optional(id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// One page of `apply(Entity::find())`, newest first unless `order` says
    /// otherwise.
    async fn find(
        &self,
        page: u64,
        page_size: u64,
        order: Option<(ColumnOf<Self>, Order)>,
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<PaginatedResponse<ModelOf<Self>>> {
        let request = PageRequest::new(page, page_size, Self::MAX_PAGE_SIZE)?;

        let query = apply(Self::Entity::find());
        let query = match order {
            Some((column, order)) => query.order_by(column, order),
            None => query.order_by_desc(Self::Entity::created_at_column()),
        };
        let rows = query
            .limit(request.probe_limit())
            .offset(request.offset())
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        Ok(PaginatedResponse::from_probe(rows, request))
    }

    fn find_iter<F>(
        &self,
        page_size: Option<u64>,
        order: Option<(ColumnOf<Self>, Order)>,
        apply: F,
    ) -> DaoPager<Self, F>
    where
        F: Fn(Select<Self::Entity>) -> Select<Self::Entity> + Clone + Send,
        ColumnOf<Self>: Clone,
    {
        DaoPager {
            dao: self.clone(),
            next: Some(PageRequest {
                page: 1,
                page_size: page_size.unwrap_or(Self::MAX_PAGE_SIZE),
            }),
            order,
            apply,
        }
    }

    /// Loads the row, lets `apply` edit it and bumps `updated_at`.
    async fn update<F>(&self, id: Uuid, apply: F) -> DaoResult<ModelOf<Self>>
    where
        F: for<'a> FnOnce(&'a mut <Self::Entity as EntityTrait>::ActiveModel) + Send,
    {
        let mut active = self.find_by_id(id).await?.into_active_model();
        apply(&mut active);
        active.set_updated_at(Utc::now().fixed_offset());

        active.update(self.db()).await.map_err(DaoLayerError::Db)
    }

    async fn delete(&self, id: Uuid) -> DaoResult<Uuid> {
        let result = Self::Entity::delete_by_id(id)
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        match result.rows_affected {
            0 => Err(Self::not_found(id)),
            _ => Ok(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PageRequest, PaginatedResponse};
    use crate::db::dao::DaoLayerError;

    #[test]
    fn page_request_bounds() {
        assert!(matches!(
            PageRequest::new(0, 10, 100),
            Err(DaoLayerError::InvalidPagination { page: 0, .. })
        ));
        assert!(PageRequest::new(1, 0, 100).is_err());
        assert!(PageRequest::new(1, 101, 100).is_err());

        let request = PageRequest::new(3, 20, 100).expect("window should be valid");
        assert_eq!(request.offset(), 40);
        assert_eq!(request.probe_limit(), 21);
        assert_eq!(request.next().page, 4);
    }

    #[test]
    fn probe_row_sets_has_next_and_is_dropped() {
        let request = PageRequest::new(1, 2, 100).expect("window should be valid");

        let full = PaginatedResponse::from_probe(vec![1, 2, 3], request);
        assert!(full.has_next);
        assert_eq!(full.data, vec![1, 2]);

        let last = PaginatedResponse::from_probe(vec![1], request);
        assert!(!last.has_next);
        assert_eq!(last.map(|n| n * 10).data, vec![10]);
    }
}
