//! Create `reservation` table.
//! `table_id` is optional; deleting the table detaches the reservation.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservation::Table)
                    .if_not_exists()
                    .col(uuid(Reservation::Id).primary_key())
                    .col(uuid(Reservation::RestaurantId))
                    .col(string_len(Reservation::CustomerName, 200))
                    .col(string_len_null(Reservation::CustomerEmail, 254))
                    .col(string_len_null(Reservation::CustomerPhone, 50))
                    .col(date(Reservation::Date))
                    .col(string_len(Reservation::Time, 5))
                    .col(integer(Reservation::PartySize))
                    .col(string_len(Reservation::Status, 16))
                    .col(uuid_null(Reservation::TableId))
                    .col(text_null(Reservation::SpecialRequests))
                    .col(timestamp_with_time_zone(Reservation::CreatedAt))
                    .col(timestamp_with_time_zone(Reservation::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_restaurant")
                            .from(Reservation::Table, Reservation::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_dining_table")
                            .from(Reservation::Table, Reservation::TableId)
                            .to(DiningTable::Table, DiningTable::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Reservation::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Reservation {
    Table,
    Id,
    RestaurantId,
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    Date,
    Time,
    PartySize,
    Status,
    TableId,
    SpecialRequests,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Restaurant {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum DiningTable {
    Table,
    Id,
}
