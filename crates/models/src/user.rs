use sea_orm::{entity::prelude::*, Condition, QueryOrder};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Date,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// All users ordered by id.
pub fn find_all() -> Select<Entity> {
    Entity::find().order_by_asc(Column::Id)
}

/// Users whose birth date lies in `[from, to]`, ordered by id.
pub fn find_by_birth_date_between(from: Date, to: Date) -> Select<Entity> {
    Entity::find()
        .filter(
            Condition::all()
                .add(Column::BirthDate.gte(from))
                .add(Column::BirthDate.lte(to)),
        )
        .order_by_asc(Column::Id)
}
