#![cfg(test)]
use migration::MigratorTrait;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::db::connect_in_memory;
use models::dining_table::TableFields;
use models::menu::MenuItemFields;
use models::reservation::ReservationFields;
use models::restaurant::RestaurantFields;

use crate::reservation_service::ReservationPolicy;
use crate::store::EntityStore;

/// Fresh in-memory database with the schema applied. Each test gets its own.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn get_store() -> Result<EntityStore, anyhow::Error> {
    Ok(EntityStore::new(get_db().await?, policy()))
}

pub fn policy() -> ReservationPolicy {
    ReservationPolicy::default()
}

pub fn gourmet_kitchen() -> RestaurantFields {
    RestaurantFields {
        name: Some("The Gourmet Kitchen".into()),
        address: Some("123 Main St, Springfield".into()),
        phone: Some("+1-555-0123".into()),
        email: Some("info@gourmetkitchen.example".into()),
        cuisine_type: Some("International".into()),
        opening_hours: None,
    }
}

pub fn menu_item(name: &str, cents: i64, category: &str) -> MenuItemFields {
    MenuItemFields {
        name: Some(name.into()),
        price: Some(Decimal::new(cents, 2)),
        category: Some(category.into()),
        ..Default::default()
    }
}

pub fn table(number: i32, capacity: i32) -> TableFields {
    TableFields {
        table_number: Some(number),
        capacity: Some(capacity),
        ..Default::default()
    }
}

pub fn reservation_at(
    name: &str,
    date: &str,
    time: &str,
    party_size: i32,
    table_id: Option<Uuid>,
) -> ReservationFields {
    ReservationFields {
        customer_name: Some(name.into()),
        customer_email: Some("guest@example.com".into()),
        date: Some(date.into()),
        time: Some(time.into()),
        party_size: Some(party_size),
        table_id: table_id.map(|id| id.to_string()),
        ..Default::default()
    }
}
