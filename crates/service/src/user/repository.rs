use async_trait::async_trait;
use chrono::NaiveDate;

use super::domain::{User, UserRecord};
use crate::errors::ServiceError;

/// Persistence gateway for user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ServiceError>;
    /// Users with `from <= birth_date <= to`.
    async fn find_by_birth_date_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<User>, ServiceError>;
    /// Insert when `record.id` is `None`, otherwise overwrite the stored row.
    async fn save(&self, record: UserRecord) -> Result<User, ServiceError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError>;
}
