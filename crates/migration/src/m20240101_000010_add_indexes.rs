//! Lookup indexes for the child collections.
//!
//! - every child table is scanned by `restaurant_id`
//! - reservations are filtered by date and checked per table for overlaps
//! - table numbers are unique inside one restaurant
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_menu_restaurant")
                    .table(Menu::Table)
                    .col(Menu::RestaurantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_dining_table_number_unique")
                    .table(DiningTable::Table)
                    .col(DiningTable::RestaurantId)
                    .col(DiningTable::TableNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_staff_restaurant")
                    .table(Staff::Table)
                    .col(Staff::RestaurantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reservation_restaurant_date")
                    .table(Reservation::Table)
                    .col(Reservation::RestaurantId)
                    .col(Reservation::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reservation_table_date")
                    .table(Reservation::Table)
                    .col(Reservation::TableId)
                    .col(Reservation::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_reservation_table_date")
                    .table(Reservation::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_reservation_restaurant_date")
                    .table(Reservation::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_staff_restaurant")
                    .table(Staff::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_dining_table_number_unique")
                    .table(DiningTable::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_menu_restaurant")
                    .table(Menu::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Menu {
    Table,
    RestaurantId,
}

#[derive(DeriveIden)]
enum DiningTable {
    Table,
    RestaurantId,
    TableNumber,
}

#[derive(DeriveIden)]
enum Staff {
    Table,
    RestaurantId,
}

#[derive(DeriveIden)]
enum Reservation {
    Table,
    RestaurantId,
    TableId,
    Date,
}
