//! Migrator registering entity-specific migrations in dependency order.
//! The restaurant root table comes first; indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_restaurant;
mod m20240101_000002_create_menu;
mod m20240101_000003_create_dining_table;
mod m20240101_000004_create_staff;
mod m20240101_000005_create_reservation;
mod m20240101_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_restaurant::Migration),
            Box::new(m20240101_000002_create_menu::Migration),
            Box::new(m20240101_000003_create_dining_table::Migration),
            Box::new(m20240101_000004_create_staff::Migration),
            Box::new(m20240101_000005_create_reservation::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000010_add_indexes::Migration),
        ]
    }
}
