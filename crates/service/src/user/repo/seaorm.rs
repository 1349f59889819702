use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait, Set};

use models::user;

use crate::errors::ServiceError;
use crate::user::domain::{User, UserData, UserRecord};
use crate::user::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn active_model(id: Option<i64>, data: UserData) -> user::ActiveModel {
    user::ActiveModel {
        id: id.map_or(NotSet, Set),
        email: Set(data.email),
        first_name: Set(data.first_name),
        last_name: Set(data.last_name),
        birth_date: Set(data.birth_date),
        address: Set(data.address),
        phone_number: Set(data.phone_number),
    }
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        let rows = user::find_all().all(&self.db).await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ServiceError> {
        let row = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(User::from))
    }

    async fn find_by_birth_date_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<User>, ServiceError> {
        let rows = user::find_by_birth_date_between(from, to).all(&self.db).await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn save(&self, record: UserRecord) -> Result<User, ServiceError> {
        let am = active_model(record.id, record.data);
        let saved = match record.id {
            None => am.insert(&self.db).await?,
            Some(id) => am.update(&self.db).await.map_err(|e| match e {
                DbErr::RecordNotUpdated => ServiceError::user_not_found(id),
                other => ServiceError::from(other),
            })?,
        };
        Ok(User::from(saved))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        user::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        let n = user::Entity::find_by_id(id).count(&self.db).await?;
        Ok(n > 0)
    }
}
