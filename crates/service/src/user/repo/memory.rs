use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::ServiceError;
use crate::user::domain::{User, UserRecord};
use crate::user::repository::UserRepository;

#[derive(Debug)]
struct State {
    users: BTreeMap<i64, User>,
    next_id: i64,
}

/// Process-local repository; ids start at 1 and are never reused.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    state: Mutex<State>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self { state: Mutex::new(State { users: BTreeMap::new(), next_id: 1 }) }
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self { Self::default() }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.lock().users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ServiceError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_by_birth_date_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<User>, ServiceError> {
        let state = self.lock();
        Ok(state
            .users
            .values()
            .filter(|u| u.birth_date >= from && u.birth_date <= to)
            .cloned()
            .collect())
    }

    async fn save(&self, record: UserRecord) -> Result<User, ServiceError> {
        let mut state = self.lock();
        if let Some(id) = record.id {
            if !state.users.contains_key(&id) {
                return Err(ServiceError::user_not_found(id));
            }
        }
        let taken = state
            .users
            .values()
            .any(|u| u.email == record.data.email && Some(u.id) != record.id);
        if taken {
            return Err(ServiceError::Conflict(format!(
                "duplicate key value violates unique constraint on users.email: {}",
                record.data.email
            )));
        }
        let id = match record.id {
            Some(id) => id,
            None => {
                let id = state.next_id;
                state.next_id += 1;
                id
            }
        };
        let user = User::from_parts(id, record.data);
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        self.lock().users.remove(&id);
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.lock().users.contains_key(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::domain::UserData;

    fn data(email: &str, birth: (i32, u32, u32)) -> UserData {
        UserData {
            email: email.into(),
            first_name: "First".into(),
            last_name: "Last".into(),
            birth_date: NaiveDate::from_ymd_opt(birth.0, birth.1, birth.2).unwrap(),
            address: None,
            phone_number: None,
        }
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids_and_updates_in_place() {
        let repo = InMemoryUserRepository::new();
        let a = repo.save(UserRecord::new(data("a@gmail.com", (1990, 1, 1)))).await.unwrap();
        let b = repo.save(UserRecord::new(data("b@gmail.com", (1991, 1, 1)))).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let mut changed = a.clone();
        changed.first_name = "Changed".into();
        let saved = repo.save(changed.clone().into()).await.unwrap();
        assert_eq!(saved, changed);
        assert_eq!(repo.find_all().await.unwrap(), vec![changed, b]);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = InMemoryUserRepository::new();
        repo.save(UserRecord::new(data("a@gmail.com", (1990, 1, 1)))).await.unwrap();
        let err = repo.save(UserRecord::new(data("a@gmail.com", (1992, 1, 1)))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryUserRepository::new();
        let a = repo.save(UserRecord::new(data("a@gmail.com", (1990, 1, 1)))).await.unwrap();
        repo.delete_by_id(a.id).await.unwrap();
        assert!(!repo.exists_by_id(a.id).await.unwrap());
        let b = repo.save(UserRecord::new(data("b@gmail.com", (1990, 1, 1)))).await.unwrap();
        assert_eq!(b.id, a.id + 1);
    }

    #[tokio::test]
    async fn birth_date_range_is_inclusive() {
        let repo = InMemoryUserRepository::new();
        let lo = repo.save(UserRecord::new(data("lo@gmail.com", (2000, 1, 1)))).await.unwrap();
        let hi = repo.save(UserRecord::new(data("hi@gmail.com", (2022, 12, 31)))).await.unwrap();
        repo.save(UserRecord::new(data("out@gmail.com", (2023, 1, 1)))).await.unwrap();
        let from = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2022, 12, 31).unwrap();
        assert_eq!(repo.find_by_birth_date_between(from, to).await.unwrap(), vec![lo, hi]);
    }

    #[tokio::test]
    async fn updating_an_unknown_id_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let record = UserRecord { id: Some(4242), data: data("ghost@gmail.com", (1990, 1, 1)) };
        let err = repo.save(record).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "User not found with id: 4242"));
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
