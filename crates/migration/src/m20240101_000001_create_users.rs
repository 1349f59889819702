//! Create `users` table.
//!
//! One row per user profile; `email` is unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Users::Email, 255).unique_key().not_null())
                    .col(string_len(Users::FirstName, 128).not_null())
                    .col(string_len(Users::LastName, 128).not_null())
                    .col(date(Users::BirthDate).not_null())
                    .col(ColumnDef::new(Users::Address).string_len(255).null())
                    .col(ColumnDef::new(Users::PhoneNumber).string_len(32).null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users { Table, Id, Email, FirstName, LastName, BirthDate, Address, PhoneNumber }
