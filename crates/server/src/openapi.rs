//! OpenAPI document served at `/api-docs/openapi.json`.
//!
//! The `*Doc` types mirror the JSON shapes of the entities and their inputs;
//! handlers deserialize into the model crate's own types.

use std::collections::BTreeMap;

use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`
    pub status: String,
    pub store_connected: bool,
    /// `openai` or `offline`
    pub ai_provider: String,
}

#[derive(ToSchema)]
pub struct FieldErrorDoc {
    pub field: String,
    pub message: String,
}

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub detail: Option<String>,
    pub fields: Option<Vec<FieldErrorDoc>>,
}

#[derive(ToSchema)]
pub struct RestaurantInputDoc {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub cuisine_type: Option<String>,
    /// weekday -> `HH:MM-HH:MM` or `closed`
    pub opening_hours: Option<BTreeMap<String, String>>,
}

#[derive(ToSchema)]
pub struct RestaurantDoc {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub cuisine_type: Option<String>,
    pub opening_hours: Option<BTreeMap<String, String>>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct MenuItemDoc {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub dietary_tags: Vec<String>,
}

#[derive(ToSchema)]
pub struct MenuInputDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub items: Option<Vec<MenuItemDoc>>,
}

#[derive(ToSchema)]
pub struct MenuDoc {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<MenuItemDoc>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct TableInputDoc {
    pub table_number: Option<i32>,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    /// available, occupied, reserved or maintenance
    pub status: Option<String>,
}

#[derive(ToSchema)]
pub struct TableDoc {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub table_number: i32,
    pub capacity: i32,
    pub location: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct StaffInputDoc {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub shift: Option<String>,
}

#[derive(ToSchema)]
pub struct StaffDoc {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub shift: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct ReservationInputDoc {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// `HH:MM`
    pub time: Option<String>,
    pub party_size: Option<i32>,
    /// pending, confirmed or cancelled
    pub status: Option<String>,
    pub table_id: Option<Uuid>,
    pub special_requests: Option<String>,
}

#[derive(ToSchema)]
pub struct ReservationDoc {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub date: String,
    pub time: String,
    pub party_size: i32,
    pub status: String,
    pub table_id: Option<Uuid>,
    pub special_requests: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct MenuRecommendationRequestDoc {
    pub restaurant_id: Uuid,
    /// free-form, e.g. `{"dietary_restrictions": ["vegan"]}`
    #[schema(value_type = Option<Object>)]
    pub preferences: Option<serde_json::Value>,
}

#[derive(ToSchema)]
pub struct ReservationRecommendationRequestDoc {
    pub restaurant_id: Uuid,
    pub party_size: i32,
    pub preferred_date: Option<String>,
}

#[derive(ToSchema)]
pub struct ChatRequestDoc {
    pub restaurant_id: Uuid,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::restaurants::create,
        crate::routes::restaurants::list,
        crate::routes::restaurants::get,
        crate::routes::restaurants::update,
        crate::routes::restaurants::delete,
        crate::routes::menus::create,
        crate::routes::menus::list,
        crate::routes::menus::get,
        crate::routes::menus::update,
        crate::routes::menus::delete,
        crate::routes::tables::create,
        crate::routes::tables::list,
        crate::routes::tables::get,
        crate::routes::tables::update,
        crate::routes::tables::delete,
        crate::routes::staff::create,
        crate::routes::staff::list,
        crate::routes::staff::get,
        crate::routes::staff::update,
        crate::routes::staff::delete,
        crate::routes::reservations::create,
        crate::routes::reservations::list,
        crate::routes::reservations::get,
        crate::routes::reservations::update,
        crate::routes::reservations::delete,
        crate::routes::reservations::confirm,
        crate::routes::reservations::cancel,
        crate::routes::analytics::reservations,
        crate::routes::analytics::revenue,
        crate::routes::analytics::popular_times,
        crate::routes::ai::recommend_menu,
        crate::routes::ai::recommend_reservation,
        crate::routes::ai::chat,
    ),
    components(
        schemas(
            HealthResponse,
            FieldErrorDoc,
            ErrorDoc,
            RestaurantInputDoc,
            RestaurantDoc,
            MenuItemDoc,
            MenuInputDoc,
            MenuDoc,
            TableInputDoc,
            TableDoc,
            StaffInputDoc,
            StaffDoc,
            ReservationInputDoc,
            ReservationDoc,
            MenuRecommendationRequestDoc,
            ReservationRecommendationRequestDoc,
            ChatRequestDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "restaurants"),
        (name = "menus"),
        (name = "tables"),
        (name = "staff"),
        (name = "reservations"),
        (name = "analytics"),
        (name = "ai")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for p in [
            "/restaurants/{id}",
            "/menus/{restaurant_id}/{id}",
            "/reservations/{restaurant_id}/{id}/confirm",
            "/analytics/{restaurant_id}/popular-times",
            "/ai/chat",
            "/health",
        ] {
            assert!(paths.contains_key(p), "missing {p}");
        }
    }
}
