//! Create `restaurant` table.
//!
//! Root of the hierarchy; every other table references it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurant::Table)
                    .if_not_exists()
                    .col(uuid(Restaurant::Id).primary_key())
                    .col(string_len(Restaurant::Name, 200))
                    .col(string_len(Restaurant::Address, 500))
                    .col(string_len(Restaurant::Phone, 50))
                    .col(string_len(Restaurant::Email, 254))
                    .col(string_len_null(Restaurant::CuisineType, 100))
                    .col(json_null(Restaurant::OpeningHours))
                    .col(timestamp_with_time_zone(Restaurant::CreatedAt))
                    .col(timestamp_with_time_zone(Restaurant::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Restaurant::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Restaurant {
    Table,
    Id,
    Name,
    Address,
    Phone,
    Email,
    CuisineType,
    OpeningHours,
    CreatedAt,
    UpdatedAt,
}
