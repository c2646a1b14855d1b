//! Deterministic answers used when no language model can be asked.

use models::dining_table::TableStatus;
use models::menu;
use models::validate::parse_time;

use super::domain::{MenuRecommendation, ReservationContext, ReservationSuggestion};
use super::errors::AiError;

pub const CHAT_UNAVAILABLE: &str =
    "I'm sorry, AI chat is currently unavailable. Please contact the restaurant directly.";
pub const CHAT_ERROR: &str =
    "I'm sorry, I encountered an error. Please try again or contact the restaurant directly.";

pub const COMMON_TIMES: [&str; 5] = ["18:00", "18:30", "19:00", "19:30", "20:00"];

const ITEMS_PER_MENU: usize = 3;
const MAX_RECOMMENDATIONS: usize = 5;

/// First three items of each menu, in order, at most five overall.
pub fn menu_recommendations(menus: &[menu::Model]) -> Vec<MenuRecommendation> {
    menus
        .iter()
        .flat_map(|m| m.items.iter().take(ITEMS_PER_MENU))
        .take(MAX_RECOMMENDATIONS)
        .map(|item| MenuRecommendation {
            item_name: item.name.clone(),
            reason: "Popular item".into(),
            match_score: 0.7,
        })
        .collect()
}

/// For each common dinner time, the lowest-numbered table that seats the
/// party, is in service, and is not booked around that time.
pub fn reservation_suggestions(ctx: &ReservationContext) -> Vec<ReservationSuggestion> {
    let mut candidates: Vec<_> = ctx
        .tables
        .iter()
        .filter(|t| t.capacity >= ctx.party_size && t.status != TableStatus::Maintenance)
        .collect();
    candidates.sort_by_key(|t| t.table_number);

    let mut out = Vec::new();
    for (i, time) in COMMON_TIMES.iter().enumerate() {
        let Some(start) = parse_time(time).map(minutes) else { continue };
        let free = candidates.iter().find(|table| {
            !ctx.bookings.iter().any(|b| {
                b.table_id == Some(table.id)
                    && b.status.holds_table()
                    && b.start_minute().is_some_and(|m| (m - start).abs() < ctx.duration_minutes)
            })
        });
        if let Some(table) = free {
            out.push(ReservationSuggestion {
                time: (*time).to_string(),
                table_number: Some(table.table_number),
                reason: "Popular dining time".into(),
                availability_score: ((0.8 - 0.1 * i as f64) * 100.0).round() / 100.0,
            });
        }
    }
    out
}

pub fn chat_reply(err: &AiError) -> &'static str {
    match err {
        AiError::Unavailable(_) => CHAT_UNAVAILABLE,
        AiError::Upstream(_) | AiError::Parse(_) => CHAT_ERROR,
    }
}

fn minutes(t: chrono::NaiveTime) -> i64 {
    use chrono::Timelike;
    i64::from(t.hour()) * 60 + i64::from(t.minute())
}
