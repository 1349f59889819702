use anyhow::Result;
use chrono::NaiveDate;
use configs::DatabaseConfig;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::{db, user};

async fn setup_test_db() -> Result<DatabaseConnection> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    db::connect_and_migrate(&cfg).await
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn insert(db: &DatabaseConnection, first_name: &str, birth_date: NaiveDate) -> Result<user::Model> {
    let am = user::ActiveModel {
        email: Set(format!("{}@gmail.com", first_name.to_lowercase())),
        first_name: Set(first_name.to_string()),
        last_name: Set("Lastname".to_string()),
        birth_date: Set(birth_date),
        address: Set(None),
        phone_number: Set(None),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

#[tokio::test]
async fn insert_assigns_increasing_ids() -> Result<()> {
    let db = setup_test_db().await?;
    let a = insert(&db, "John", date(1990, 5, 15)).await?;
    let b = insert(&db, "Jane", date(1995, 8, 25)).await?;
    assert!(b.id > a.id);

    let found = user::Entity::find_by_id(a.id).one(&db).await?.unwrap();
    assert_eq!(found, a);
    Ok(())
}

#[tokio::test]
async fn find_by_birth_date_between_is_inclusive() -> Result<()> {
    let db = setup_test_db().await?;
    let john = insert(&db, "John", date(1990, 5, 15)).await?;
    let jane = insert(&db, "Jane", date(1995, 8, 25)).await?;
    let _old = insert(&db, "Old", date(1980, 1, 1)).await?;
    let edge = insert(&db, "Edge", date(1995, 12, 31)).await?;

    let users = user::find_by_birth_date_between(date(1990, 1, 1), date(1995, 12, 31)).all(&db).await?;
    assert_eq!(users, vec![john, jane, edge]);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_unique_violation() -> Result<()> {
    let db = setup_test_db().await?;
    insert(&db, "John", date(1990, 5, 15)).await?;
    let err = insert(&db, "John", date(1991, 5, 15)).await.unwrap_err();
    let db_err = err.downcast::<sea_orm::DbErr>()?;
    assert!(matches!(db_err.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))));
    Ok(())
}
