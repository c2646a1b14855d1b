use std::future::Future;
use std::time::Instant;

use sea_orm::DatabaseConnection;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use models::dining_table::{self, TableFields};
use models::menu::{self, MenuFields};
use models::reservation::{self, ReservationFields};
use models::restaurant::{self, RestaurantFields};
use models::staff::{self, StaffFields};

use crate::analytics::{self, PopularTimes, ReservationStats, RevenueEstimate};
use crate::errors::ServiceError;
use crate::observability::{STORE_DURATION, STORE_ERRORS_TOTAL, STORE_OPERATIONS_TOTAL};
use crate::reservation_service::{ReservationFilter, ReservationPolicy};
use crate::{
    menu_service, reservation_service, restaurant_service, staff_service, table_service,
};

/// Hierarchical entity store: restaurants and their menus, tables, staff and reservations.
///
/// Cheap to clone; every clone shares the connection pool.
#[derive(Clone)]
pub struct EntityStore {
    db: DatabaseConnection,
    policy: ReservationPolicy,
}

async fn observed<T>(
    entity: &'static str,
    operation: &'static str,
    fut: impl Future<Output = Result<T, ServiceError>>,
) -> Result<T, ServiceError> {
    let started = Instant::now();
    let result = fut.await;
    STORE_OPERATIONS_TOTAL
        .with_label_values(&[entity, operation])
        .inc();
    STORE_DURATION
        .with_label_values(&[entity])
        .observe(started.elapsed().as_secs_f64());
    if let Err(e) = &result {
        STORE_ERRORS_TOTAL.with_label_values(&[e.kind()]).inc();
        match e {
            ServiceError::Unavailable(_) | ServiceError::Db(_) => {
                warn!(entity, operation, error = %e, "store_operation_failed")
            }
            _ => debug!(entity, operation, error = %e, "store_operation_rejected"),
        }
    }
    result
}

impl EntityStore {
    pub fn new(db: DatabaseConnection, policy: ReservationPolicy) -> Self {
        Self { db, policy }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn policy(&self) -> &ReservationPolicy {
        &self.policy
    }

    /// Whether the database answers.
    pub async fn ping(&self) -> bool {
        match self.db.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "store_ping_failed");
                false
            }
        }
    }

    // restaurants

    #[instrument(skip(self, fields))]
    pub async fn create_restaurant(
        &self,
        fields: RestaurantFields,
    ) -> Result<restaurant::Model, ServiceError> {
        let fut = restaurant_service::create_restaurant(&self.db, fields);
        observed("restaurant", "create", fut).await
    }

    #[instrument(skip(self))]
    pub async fn get_restaurant(&self, id: Uuid) -> Result<restaurant::Model, ServiceError> {
        let fut = restaurant_service::get_restaurant(&self.db, id);
        observed("restaurant", "get", fut).await
    }

    #[instrument(skip(self))]
    pub async fn list_restaurants(&self) -> Result<Vec<restaurant::Model>, ServiceError> {
        let fut = restaurant_service::list_restaurants(&self.db);
        observed("restaurant", "list", fut).await
    }

    #[instrument(skip(self, fields))]
    pub async fn update_restaurant(
        &self,
        id: Uuid,
        fields: RestaurantFields,
    ) -> Result<restaurant::Model, ServiceError> {
        let fut = restaurant_service::update_restaurant(&self.db, id, fields);
        observed("restaurant", "update", fut).await
    }

    #[instrument(skip(self))]
    pub async fn delete_restaurant(&self, id: Uuid) -> Result<(), ServiceError> {
        let fut = restaurant_service::delete_restaurant(&self.db, id);
        observed("restaurant", "delete", fut).await
    }

    // menus

    #[instrument(skip(self, fields))]
    pub async fn create_menu(
        &self,
        restaurant_id: Uuid,
        fields: MenuFields,
    ) -> Result<menu::Model, ServiceError> {
        let fut = menu_service::create_menu(&self.db, restaurant_id, fields);
        observed("menu", "create", fut).await
    }

    #[instrument(skip(self))]
    pub async fn get_menu(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
    ) -> Result<menu::Model, ServiceError> {
        let fut = menu_service::get_menu(&self.db, restaurant_id, id);
        observed("menu", "get", fut).await
    }

    #[instrument(skip(self))]
    pub async fn list_menus(&self, restaurant_id: Uuid) -> Result<Vec<menu::Model>, ServiceError> {
        let fut = menu_service::list_menus(&self.db, restaurant_id);
        observed("menu", "list", fut).await
    }

    #[instrument(skip(self, fields))]
    pub async fn update_menu(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        fields: MenuFields,
    ) -> Result<menu::Model, ServiceError> {
        let fut = menu_service::update_menu(&self.db, restaurant_id, id, fields);
        observed("menu", "update", fut).await
    }

    #[instrument(skip(self))]
    pub async fn delete_menu(&self, restaurant_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let fut = menu_service::delete_menu(&self.db, restaurant_id, id);
        observed("menu", "delete", fut).await
    }

    // tables

    #[instrument(skip(self, fields))]
    pub async fn create_table(
        &self,
        restaurant_id: Uuid,
        fields: TableFields,
    ) -> Result<dining_table::Model, ServiceError> {
        let fut = table_service::create_table(&self.db, restaurant_id, fields);
        observed("table", "create", fut).await
    }

    #[instrument(skip(self))]
    pub async fn get_table(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
    ) -> Result<dining_table::Model, ServiceError> {
        let fut = table_service::get_table(&self.db, restaurant_id, id);
        observed("table", "get", fut).await
    }

    #[instrument(skip(self))]
    pub async fn list_tables(
        &self,
        restaurant_id: Uuid,
    ) -> Result<Vec<dining_table::Model>, ServiceError> {
        let fut = table_service::list_tables(&self.db, restaurant_id);
        observed("table", "list", fut).await
    }

    #[instrument(skip(self, fields))]
    pub async fn update_table(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        fields: TableFields,
    ) -> Result<dining_table::Model, ServiceError> {
        let fut = table_service::update_table(&self.db, restaurant_id, id, fields);
        observed("table", "update", fut).await
    }

    #[instrument(skip(self))]
    pub async fn delete_table(&self, restaurant_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let fut = table_service::delete_table(&self.db, restaurant_id, id);
        observed("table", "delete", fut).await
    }

    // staff

    #[instrument(skip(self, fields))]
    pub async fn create_staff(
        &self,
        restaurant_id: Uuid,
        fields: StaffFields,
    ) -> Result<staff::Model, ServiceError> {
        let fut = staff_service::create_staff(&self.db, restaurant_id, fields);
        observed("staff", "create", fut).await
    }

    #[instrument(skip(self))]
    pub async fn get_staff(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
    ) -> Result<staff::Model, ServiceError> {
        let fut = staff_service::get_staff(&self.db, restaurant_id, id);
        observed("staff", "get", fut).await
    }

    #[instrument(skip(self))]
    pub async fn list_staff(&self, restaurant_id: Uuid) -> Result<Vec<staff::Model>, ServiceError> {
        let fut = staff_service::list_staff(&self.db, restaurant_id);
        observed("staff", "list", fut).await
    }

    #[instrument(skip(self, fields))]
    pub async fn update_staff(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        fields: StaffFields,
    ) -> Result<staff::Model, ServiceError> {
        let fut = staff_service::update_staff(&self.db, restaurant_id, id, fields);
        observed("staff", "update", fut).await
    }

    #[instrument(skip(self))]
    pub async fn delete_staff(&self, restaurant_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let fut = staff_service::delete_staff(&self.db, restaurant_id, id);
        observed("staff", "delete", fut).await
    }

    // reservations

    #[instrument(skip(self, fields))]
    pub async fn create_reservation(
        &self,
        restaurant_id: Uuid,
        fields: ReservationFields,
    ) -> Result<reservation::Model, ServiceError> {
        let fut =
            reservation_service::create_reservation(&self.db, &self.policy, restaurant_id, fields);
        observed("reservation", "create", fut).await
    }

    #[instrument(skip(self))]
    pub async fn get_reservation(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
    ) -> Result<reservation::Model, ServiceError> {
        let fut = reservation_service::get_reservation(&self.db, restaurant_id, id);
        observed("reservation", "get", fut).await
    }

    #[instrument(skip(self))]
    pub async fn list_reservations(
        &self,
        restaurant_id: Uuid,
        filter: &ReservationFilter,
    ) -> Result<Vec<reservation::Model>, ServiceError> {
        let fut = reservation_service::list_reservations(&self.db, restaurant_id, filter);
        observed("reservation", "list", fut).await
    }

    #[instrument(skip(self, fields))]
    pub async fn update_reservation(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
        fields: ReservationFields,
    ) -> Result<reservation::Model, ServiceError> {
        let fut = reservation_service::update_reservation(
            &self.db,
            &self.policy,
            restaurant_id,
            id,
            fields,
        );
        observed("reservation", "update", fut).await
    }

    #[instrument(skip(self))]
    pub async fn delete_reservation(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
    ) -> Result<(), ServiceError> {
        let fut = reservation_service::delete_reservation(&self.db, restaurant_id, id);
        observed("reservation", "delete", fut).await
    }

    #[instrument(skip(self))]
    pub async fn confirm_reservation(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
    ) -> Result<reservation::Model, ServiceError> {
        let fut = reservation_service::confirm_reservation(&self.db, restaurant_id, id);
        observed("reservation", "confirm", fut).await
    }

    #[instrument(skip(self))]
    pub async fn cancel_reservation(
        &self,
        restaurant_id: Uuid,
        id: Uuid,
    ) -> Result<reservation::Model, ServiceError> {
        let fut = reservation_service::cancel_reservation(&self.db, restaurant_id, id);
        observed("reservation", "cancel", fut).await
    }

    // analytics

    pub async fn reservation_analytics(
        &self,
        restaurant_id: Uuid,
    ) -> Result<ReservationStats, ServiceError> {
        let list = self
            .list_reservations(restaurant_id, &ReservationFilter::default())
            .await?;
        Ok(analytics::reservation_stats(restaurant_id, &list))
    }

    pub async fn revenue_analytics(
        &self,
        restaurant_id: Uuid,
    ) -> Result<RevenueEstimate, ServiceError> {
        let menus = self.list_menus(restaurant_id).await?;
        let list = self
            .list_reservations(restaurant_id, &ReservationFilter::default())
            .await?;
        Ok(analytics::revenue_estimate(restaurant_id, &menus, &list))
    }

    pub async fn popular_times(&self, restaurant_id: Uuid) -> Result<PopularTimes, ServiceError> {
        let list = self
            .list_reservations(restaurant_id, &ReservationFilter::default())
            .await?;
        Ok(analytics::popular_times(restaurant_id, &list))
    }
}
