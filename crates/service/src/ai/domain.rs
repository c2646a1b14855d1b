use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::{dining_table, menu, reservation, restaurant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuRecommendation {
    pub item_name: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub match_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationSuggestion {
    pub time: String,
    #[serde(default)]
    pub table_number: Option<i32>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub availability_score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuRecommendationRequest {
    pub restaurant_id: Uuid,
    /// Free-form, e.g. `{"dietary_restrictions": ["vegan"], "price_range": "low"}`.
    #[serde(default)]
    pub preferences: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReservationRecommendationRequest {
    pub restaurant_id: Uuid,
    pub party_size: Option<i32>,
    /// `YYYY-MM-DD`, today when absent.
    pub preferred_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub restaurant_id: Uuid,
    pub message: Option<String>,
}

/// Everything an assistant may look at for a menu recommendation.
#[derive(Debug, Clone)]
pub struct MenuContext {
    pub restaurant: restaurant::Model,
    pub menus: Vec<menu::Model>,
    pub preferences: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct ReservationContext {
    pub restaurant: restaurant::Model,
    /// Ordered by table number.
    pub tables: Vec<dining_table::Model>,
    /// Non-cancelled reservations on `preferred_date`.
    pub bookings: Vec<reservation::Model>,
    pub party_size: i32,
    pub preferred_date: NaiveDate,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct ChatContext {
    pub restaurant: restaurant::Model,
    pub menus: Vec<menu::Model>,
    pub message: String,
}
