//! Read-only reporting over one restaurant's stored data.

use std::collections::BTreeMap;

use chrono::{Datelike, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use models::menu;
use models::reservation::{self, ReservationStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationStats {
    pub restaurant_id: Uuid,
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    /// Guests over reservations that are not cancelled.
    pub total_guests: i64,
    pub average_party_size: f64,
    pub by_date: BTreeMap<String, usize>,
}

pub fn reservation_stats(
    restaurant_id: Uuid,
    reservations: &[reservation::Model],
) -> ReservationStats {
    let mut by_status: BTreeMap<String, usize> = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Cancelled,
    ]
    .iter()
    .map(|s| (s.as_str().to_string(), 0))
    .collect();
    let mut by_date = BTreeMap::new();
    let mut active = 0usize;
    let mut total_guests = 0i64;

    for r in reservations {
        *by_status.entry(r.status.as_str().to_string()).or_default() += 1;
        *by_date.entry(r.date.format("%Y-%m-%d").to_string()).or_default() += 1;
        if r.status.holds_table() {
            active += 1;
            total_guests += i64::from(r.party_size);
        }
    }

    let average_party_size = if active == 0 {
        0.0
    } else {
        round2(total_guests as f64 / active as f64)
    };

    ReservationStats {
        restaurant_id,
        total: reservations.len(),
        by_status,
        total_guests,
        average_party_size,
        by_date,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub items: usize,
    pub average_price: Decimal,
}

/// Revenue estimate. No orders are stored, so it is the average item price
/// times the covers of confirmed reservations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueEstimate {
    pub restaurant_id: Uuid,
    pub menu_items: usize,
    pub average_item_price: Decimal,
    pub confirmed_reservations: usize,
    pub confirmed_covers: i64,
    pub estimated_revenue: Decimal,
    pub by_category: BTreeMap<String, CategoryStats>,
}

pub fn revenue_estimate(
    restaurant_id: Uuid,
    menus: &[menu::Model],
    reservations: &[reservation::Model],
) -> RevenueEstimate {
    let mut total = Decimal::ZERO;
    let mut count = 0usize;
    let mut categories: BTreeMap<String, (usize, Decimal)> = BTreeMap::new();
    for item in menus.iter().flat_map(|m| m.items.iter()) {
        total += item.price;
        count += 1;
        let key = item.category.clone().unwrap_or_else(|| "uncategorized".to_string());
        let slot = categories.entry(key).or_insert((0, Decimal::ZERO));
        slot.0 += 1;
        slot.1 += item.price;
    }
    let average_item_price = average(total, count);

    let confirmed: Vec<_> = reservations
        .iter()
        .filter(|r| r.status == ReservationStatus::Confirmed)
        .collect();
    let confirmed_covers: i64 = confirmed.iter().map(|r| i64::from(r.party_size)).sum();

    RevenueEstimate {
        restaurant_id,
        menu_items: count,
        average_item_price,
        confirmed_reservations: confirmed.len(),
        confirmed_covers,
        estimated_revenue: (average_item_price * Decimal::from(confirmed_covers)).round_dp(2),
        by_category: categories
            .into_iter()
            .map(|(k, (items, sum))| {
                let stats = CategoryStats {
                    items,
                    average_price: average(sum, items),
                };
                (k, stats)
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourSlot {
    pub hour: String,
    pub reservations: usize,
    pub guests: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayCount {
    pub weekday: String,
    pub reservations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularTimes {
    pub restaurant_id: Uuid,
    /// Busiest first; ties by hour.
    pub by_hour: Vec<HourSlot>,
    /// Monday first.
    pub by_weekday: Vec<WeekdayCount>,
    pub peak_hour: Option<String>,
}

pub fn popular_times(restaurant_id: Uuid, reservations: &[reservation::Model]) -> PopularTimes {
    let mut hours: BTreeMap<String, (usize, i64)> = BTreeMap::new();
    let mut weekdays = [0usize; 7];
    for r in reservations.iter().filter(|r| r.status.holds_table()) {
        if let Some(minute) = r.start_minute() {
            let slot = hours.entry(format!("{:02}:00", minute / 60)).or_insert((0, 0));
            slot.0 += 1;
            slot.1 += i64::from(r.party_size);
        }
        weekdays[r.date.weekday().num_days_from_monday() as usize] += 1;
    }

    let mut by_hour: Vec<HourSlot> = hours
        .into_iter()
        .map(|(hour, (reservations, guests))| HourSlot {
            hour,
            reservations,
            guests,
        })
        .collect();
    by_hour.sort_by(|a, b| b.reservations.cmp(&a.reservations).then_with(|| a.hour.cmp(&b.hour)));

    let by_weekday = WEEK
        .iter()
        .zip(weekdays)
        .map(|(day, reservations)| WeekdayCount {
            weekday: weekday_name(*day).to_string(),
            reservations,
        })
        .collect();

    PopularTimes {
        restaurant_id,
        peak_hour: by_hour.first().map(|s| s.hour.clone()),
        by_hour,
        by_weekday,
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

fn average(sum: Decimal, n: usize) -> Decimal {
    if n == 0 {
        Decimal::ZERO
    } else {
        (sum / Decimal::from(n)).round_dp(2)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::clock;
    use models::menu::{MenuFields, MenuItemFields};
    use models::reservation::ReservationFields;

    fn res(date: &str, time: &str, party: i32, status: &str) -> reservation::Model {
        let mut m = ReservationFields {
            customer_name: Some("Guest".into()),
            date: Some(date.into()),
            time: Some(time.into()),
            party_size: Some(party),
            ..Default::default()
        }
        .into_model(Uuid::nil(), clock::now())
        .expect("valid reservation");
        m.status = ReservationStatus::parse(status).expect("status");
        m
    }

    fn item(name: &str, cents: i64, category: Option<&str>) -> MenuItemFields {
        MenuItemFields {
            name: Some(name.into()),
            price: Some(Decimal::new(cents, 2)),
            category: category.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn reservation_stats_count_everything() {
        let list = vec![
            res("2024-01-15", "19:00", 4, "pending"),
            res("2024-01-15", "20:00", 2, "confirmed"),
            res("2024-01-16", "19:00", 6, "cancelled"),
        ];
        let s = reservation_stats(Uuid::nil(), &list);
        assert_eq!(s.total, 3);
        assert_eq!(s.by_status["pending"], 1);
        assert_eq!(s.by_status["confirmed"], 1);
        assert_eq!(s.by_status["cancelled"], 1);
        assert_eq!(s.total_guests, 6);
        assert_eq!(s.average_party_size, 3.0);
        assert_eq!(s.by_date["2024-01-15"], 2);
    }

    #[test]
    fn empty_restaurant_has_zeroed_stats() {
        let s = reservation_stats(Uuid::nil(), &[]);
        assert_eq!(s.total, 0);
        assert_eq!(s.average_party_size, 0.0);
        let r = revenue_estimate(Uuid::nil(), &[], &[]);
        assert_eq!(r.estimated_revenue, Decimal::ZERO);
        let p = popular_times(Uuid::nil(), &[]);
        assert!(p.peak_hour.is_none());
        assert_eq!(p.by_weekday.len(), 7);
    }

    #[test]
    fn revenue_uses_confirmed_covers() {
        let menus = vec![MenuFields {
            name: Some("Dinner".into()),
            items: Some(vec![
                item("Soup", 600, Some("Starters")),
                item("Steak", 3000, Some("Mains")),
                item("Bread", 300, None),
            ]),
            ..Default::default()
        }
        .into_model(Uuid::nil(), clock::now())
        .expect("menu")];
        let list = vec![
            res("2024-01-15", "19:00", 4, "confirmed"),
            res("2024-01-15", "19:00", 10, "pending"),
        ];

        let r = revenue_estimate(Uuid::nil(), &menus, &list);
        assert_eq!(r.menu_items, 3);
        assert_eq!(r.average_item_price, Decimal::new(1300, 2));
        assert_eq!(r.confirmed_covers, 4);
        assert_eq!(r.estimated_revenue, Decimal::new(5200, 2));
        assert_eq!(r.by_category["uncategorized"].items, 1);
        assert_eq!(r.by_category["Mains"].average_price, Decimal::new(3000, 2));
    }

    #[test]
    fn popular_times_sorts_by_volume_then_hour() {
        let list = vec![
            res("2024-01-15", "19:00", 2, "pending"),
            res("2024-01-15", "19:30", 4, "confirmed"),
            res("2024-01-16", "18:00", 2, "pending"),
            res("2024-01-20", "12:15", 2, "pending"),
            res("2024-01-20", "21:00", 8, "cancelled"),
        ];
        let p = popular_times(Uuid::nil(), &list);
        let hours: Vec<_> = p.by_hour.iter().map(|s| (s.hour.as_str(), s.reservations)).collect();
        assert_eq!(hours, [("19:00", 2), ("12:00", 1), ("18:00", 1)]);
        assert_eq!(p.by_hour[0].guests, 6);
        assert_eq!(p.peak_hour.as_deref(), Some("19:00"));
        // 2024-01-15 is a Monday, 2024-01-20 a Saturday
        assert_eq!(p.by_weekday[0].weekday, "monday");
        assert_eq!(p.by_weekday[0].reservations, 2);
        assert_eq!(p.by_weekday[5].reservations, 1);
    }
}
