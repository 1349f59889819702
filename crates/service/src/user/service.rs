use std::sync::Arc;

use chrono::{Local, Months, NaiveDate};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::domain::{User, UserData, UserRecord};
use super::patch::parse_updates;
use super::repository::UserRepository;
use crate::errors::ServiceError;

/// Business rules applied to user records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserPolicy {
    /// Minimum age in whole years at creation time.
    pub min_age: u32,
}

impl Default for UserPolicy {
    fn default() -> Self { Self { min_age: 18 } }
}

impl UserPolicy {
    /// Latest birth date that still satisfies the minimum age on `today`.
    /// Feb 29 clamps to Feb 28 in non-leap years.
    pub fn latest_eligible_birth_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_months(Months::new(self.min_age.saturating_mul(12)))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn check_age(&self, birth_date: NaiveDate, today: NaiveDate) -> Result<(), ServiceError> {
        if birth_date > self.latest_eligible_birth_date(today) {
            return Err(ServiceError::Validation(format!(
                "User must be at least {} years old.",
                self.min_age
            )));
        }
        Ok(())
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// User business service independent of web framework
pub struct UserService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
    policy: UserPolicy,
    today: fn() -> NaiveDate,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>, policy: UserPolicy) -> Self {
        Self { repo, policy, today: local_today }
    }

    /// Replace the clock used for the age check.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<User>, ServiceError> {
        let users = self.repo.find_all().await?;
        info!(count = users.len(), "users_listed");
        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<User, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::user_not_found(id))
    }

    /// Create a user after checking the minimum age.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use chrono::NaiveDate;
    /// use service::user::{InMemoryUserRepository, UserData, UserPolicy, UserService};
    /// let svc = UserService::new(Arc::new(InMemoryUserRepository::new()), UserPolicy { min_age: 18 });
    /// let input = UserData {
    ///     email: "user1@gmail.com".into(),
    ///     first_name: "user1".into(),
    ///     last_name: "Lastname".into(),
    ///     birth_date: NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
    ///     address: None,
    ///     phone_number: None,
    /// };
    /// let user = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(user.id, 1);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: UserData) -> Result<User, ServiceError> {
        self.policy.check_age(input.birth_date, (self.today)())?;
        let user = self.repo.save(UserRecord::new(input)).await?;
        info!(user_id = user.id, "user_created");
        Ok(user)
    }

    /// Apply a partial update. Every key is validated before the record changes.
    #[instrument(skip(self, updates), fields(user_id = id))]
    pub async fn patch(&self, id: i64, updates: &Map<String, Value>) -> Result<User, ServiceError> {
        let mut user = self.get(id).await?;
        let patches = parse_updates(updates)?;
        let fields: Vec<&str> = patches.iter().map(|p| p.field().key()).collect();
        for p in patches {
            p.apply(&mut user);
        }
        let saved = self.repo.save(user.into()).await?;
        info!(user_id = saved.id, ?fields, "user_patched");
        Ok(saved)
    }

    /// Overwrite every mutable field; the stored id always wins.
    #[instrument(skip(self, input), fields(user_id = id))]
    pub async fn replace_all(&self, id: i64, input: UserData) -> Result<User, ServiceError> {
        let mut user = self.get(id).await?;
        user.replace_data(input);
        let saved = self.repo.save(user.into()).await?;
        info!(user_id = saved.id, "user_replaced");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if !self.repo.exists_by_id(id).await? {
            return Err(ServiceError::user_not_found(id));
        }
        self.repo.delete_by_id(id).await?;
        info!(user_id = id, "user_deleted");
        Ok(())
    }

    /// Users born within `[from, to]`.
    #[instrument(skip(self))]
    pub async fn search_by_birth_date_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<User>, ServiceError> {
        if from > to {
            return Err(ServiceError::Validation("From date must be before To date.".into()));
        }
        let users = self.repo.find_by_birth_date_between(from, to).await?;
        info!(count = users.len(), "users_searched");
        Ok(users)
    }
}
