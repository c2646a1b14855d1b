//! Create `staff` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Staff::Table)
                    .if_not_exists()
                    .col(uuid(Staff::Id).primary_key())
                    .col(uuid(Staff::RestaurantId))
                    .col(string_len(Staff::Name, 200))
                    .col(string_len(Staff::Email, 254))
                    .col(string_len(Staff::Role, 100))
                    .col(string_len_null(Staff::Phone, 50))
                    .col(string_len_null(Staff::Shift, 50))
                    .col(timestamp_with_time_zone(Staff::CreatedAt))
                    .col(timestamp_with_time_zone(Staff::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_restaurant")
                            .from(Staff::Table, Staff::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Staff::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Staff {
    Table,
    Id,
    RestaurantId,
    Name,
    Email,
    Role,
    Phone,
    Shift,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Restaurant {
    Table,
    Id,
}
