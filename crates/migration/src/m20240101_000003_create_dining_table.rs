//! Create `dining_table` table (`table` itself is a reserved word).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DiningTable::Table)
                    .if_not_exists()
                    .col(uuid(DiningTable::Id).primary_key())
                    .col(uuid(DiningTable::RestaurantId))
                    .col(integer(DiningTable::TableNumber))
                    .col(integer(DiningTable::Capacity))
                    .col(string_len_null(DiningTable::Location, 100))
                    .col(string_len(DiningTable::Status, 16))
                    .col(timestamp_with_time_zone(DiningTable::CreatedAt))
                    .col(timestamp_with_time_zone(DiningTable::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dining_table_restaurant")
                            .from(DiningTable::Table, DiningTable::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(DiningTable::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum DiningTable {
    Table,
    Id,
    RestaurantId,
    TableNumber,
    Capacity,
    Location,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Restaurant {
    Table,
    Id,
}
