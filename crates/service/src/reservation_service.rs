//! Reservation lifecycle and booking rules.
//!
//! A reservation that holds a table (anything not cancelled) blocks it for
//! one seating, `duration_minutes` from its start. Two seatings on the same
//! table and date collide when their start times are closer than that.
//!
//! Writes that may claim a table run in one transaction with the table row
//! locked, so two concurrent bookings cannot both pass the overlap check.

use chrono::{Days, NaiveDate, Utc};
use configs::ReservationConfig;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use models::reservation::{self, ReservationFields, ReservationStatus};
use models::{clock, dining_table, patch};

use crate::errors::ServiceError;
use crate::restaurant_service::require_restaurant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationPolicy {
    pub max_days_ahead: i64,
    pub duration_minutes: i64,
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self::from(&ReservationConfig::default())
    }
}

impl From<&ReservationConfig> for ReservationPolicy {
    fn from(cfg: &ReservationConfig) -> Self {
        Self {
            max_days_ahead: cfg.max_days_ahead,
            duration_minutes: cfg.default_duration_minutes,
        }
    }
}

impl ReservationPolicy {
    /// Last bookable date, `None` when the horizon runs past the calendar.
    pub fn latest_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        let days = u64::try_from(self.max_days_ahead).unwrap_or(0);
        today.checked_add_days(Days::new(days))
    }

    /// Past dates are accepted; the future is bounded.
    pub fn check_date(&self, date: NaiveDate, today: NaiveDate) -> Result<(), ServiceError> {
        match self.latest_date(today) {
            Some(latest) if date > latest => Err(ServiceError::invalid_field(
                "date",
                format!(
                    "must be at most {} days ahead (latest {latest})",
                    self.max_days_ahead
                ),
            )),
            _ => Ok(()),
        }
    }

    /// Whether seatings starting at minutes `a` and `b` of the same day collide.
    pub fn overlaps(&self, a: i64, b: i64) -> bool {
        (a - b).abs() < self.duration_minutes
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub date: Option<NaiveDate>,
    pub status: Option<ReservationStatus>,
}

/// Non-cancelled reservations on `table_id` for `date`.
pub(crate) async fn table_bookings<C: ConnectionTrait>(
    db: &C,
    table_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<reservation::Model>, ServiceError> {
    Ok(reservation::Entity::find()
        .filter(reservation::Column::TableId.eq(table_id))
        .filter(reservation::Column::Date.eq(date))
        .filter(reservation::Column::Status.ne(ReservationStatus::Cancelled))
        .order_by_asc(reservation::Column::Time)
        .all(db)
        .await?)
}

/// Which booking rules a write has to pass.
#[derive(Debug, Clone, Copy)]
struct Checks {
    date: bool,
    table: bool,
    capacity: bool,
    overlap: bool,
}

impl Checks {
    fn all() -> Self {
        Self {
            date: true,
            table: true,
            capacity: true,
            overlap: true,
        }
    }

    /// Only what `next` changes relative to `current`. A reservation that no
    /// longer holds its table is never measured against it.
    fn between(current: &reservation::Model, next: &reservation::Model) -> Self {
        let holds = next.status.holds_table();
        let table_moved = next.table_id != current.table_id;
        let claims_table = holds && !current.status.holds_table();
        let seating_moved =
            table_moved || next.date != current.date || next.time != current.time;
        Self {
            date: next.date != current.date,
            table: table_moved,
            capacity: holds && (table_moved || next.party_size != current.party_size),
            overlap: holds && (seating_moved || claims_table),
        }
    }

    fn any_table_rule(&self) -> bool {
        self.table || self.capacity || self.overlap
    }
}

/// The table row, locked for the rest of the transaction where the backend supports it.
async fn lock_table<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    table_id: Uuid,
) -> Result<Option<dining_table::Model>, ServiceError> {
    Ok(dining_table::Entity::find_by_id(table_id)
        .filter(dining_table::Column::RestaurantId.eq(restaurant_id))
        .lock_exclusive()
        .one(db)
        .await?)
}

async fn enforce_policy<C: ConnectionTrait>(
    db: &C,
    policy: &ReservationPolicy,
    candidate: &reservation::Model,
    checks: Checks,
) -> Result<(), ServiceError> {
    if checks.date {
        policy.check_date(candidate.date, Utc::now().date_naive())?;
    }
    let Some(table_id) = candidate.table_id else {
        return Ok(());
    };
    if !checks.any_table_rule() {
        return Ok(());
    }
    let table = lock_table(db, candidate.restaurant_id, table_id)
        .await?
        .ok_or_else(|| {
            ServiceError::invalid_field("table_id", "does not name a table of this restaurant")
        })?;
    if checks.capacity && candidate.party_size > table.capacity {
        return Err(ServiceError::invalid_field(
            "party_size",
            format!("exceeds capacity {} of table {}", table.capacity, table.table_number),
        ));
    }
    if !checks.overlap {
        return Ok(());
    }
    let Some(start) = candidate.start_minute() else {
        return Ok(());
    };
    let clash = table_bookings(db, table_id, candidate.date)
        .await?
        .into_iter()
        .filter(|other| other.id != candidate.id)
        .find(|other| other.start_minute().is_some_and(|m| policy.overlaps(start, m)));
    if let Some(other) = clash {
        return Err(ServiceError::Conflict(format!(
            "table {} is already booked at {} on {}",
            table.table_number, other.time, other.date
        )));
    }
    Ok(())
}

pub async fn create_reservation<C: TransactionTrait>(
    db: &C,
    policy: &ReservationPolicy,
    restaurant_id: Uuid,
    fields: ReservationFields,
) -> Result<reservation::Model, ServiceError> {
    let model = fields.into_model(restaurant_id, clock::now())?;
    let txn = db.begin().await?;
    require_restaurant(&txn, restaurant_id).await?;
    enforce_policy(&txn, policy, &model, Checks::all()).await?;
    let created = reservation::ActiveModel::from(model).reset_all().insert(&txn).await?;
    txn.commit().await?;
    Ok(created)
}

pub async fn get_reservation<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
) -> Result<reservation::Model, ServiceError> {
    require_restaurant(db, restaurant_id).await?;
    reservation::Entity::find_by_id(id)
        .filter(reservation::Column::RestaurantId.eq(restaurant_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("reservation"))
}

/// Reservations of one restaurant in creation order, optionally narrowed to one date and status.
pub async fn list_reservations<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    filter: &ReservationFilter,
) -> Result<Vec<reservation::Model>, ServiceError> {
    require_restaurant(db, restaurant_id).await?;
    let mut q =
        reservation::Entity::find().filter(reservation::Column::RestaurantId.eq(restaurant_id));
    if let Some(date) = filter.date {
        q = q.filter(reservation::Column::Date.eq(date));
    }
    if let Some(status) = filter.status {
        q = q.filter(reservation::Column::Status.eq(status));
    }
    Ok(q.order_by_asc(reservation::Column::CreatedAt)
        .order_by_asc(reservation::Column::Id)
        .all(db)
        .await?)
}

pub async fn update_reservation<C: TransactionTrait>(
    db: &C,
    policy: &ReservationPolicy,
    restaurant_id: Uuid,
    id: Uuid,
    fields: ReservationFields,
) -> Result<reservation::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = get_reservation(&txn, restaurant_id, id).await?;
    let mut next = current.clone();
    fields.apply_to(&mut next)?;

    enforce_policy(&txn, policy, &next, Checks::between(&current, &next)).await?;
    next.updated_at = clock::after(&current.updated_at);
    let updated = patch::changed_columns::<reservation::Entity>(&current, &next)
        .update(&txn)
        .await?;
    txn.commit().await?;
    Ok(updated)
}

pub async fn delete_reservation<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
) -> Result<(), ServiceError> {
    get_reservation(db, restaurant_id, id).await?;
    reservation::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

/// Move a reservation to `next`. Asking for the current status changes nothing.
pub async fn set_status<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
    next: ReservationStatus,
) -> Result<reservation::Model, ServiceError> {
    let current = get_reservation(db, restaurant_id, id).await?;
    let mut updated = current.clone();
    if !reservation::transition(&mut updated, next)? {
        return Ok(current);
    }
    updated.updated_at = clock::after(&current.updated_at);
    Ok(patch::changed_columns::<reservation::Entity>(&current, &updated)
        .update(db)
        .await?)
}

pub async fn confirm_reservation<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
) -> Result<reservation::Model, ServiceError> {
    set_status(db, restaurant_id, id, ReservationStatus::Confirmed).await
}

pub async fn cancel_reservation<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
) -> Result<reservation::Model, ServiceError> {
    set_status(db, restaurant_id, id, ReservationStatus::Cancelled).await
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use models::dining_table::TableFields;

    use sea_orm::DatabaseConnection;

    use super::*;
    use crate::restaurant_service::create_restaurant;
    use crate::table_service::{create_table, update_table};
    use crate::test_support::{get_db, gourmet_kitchen, policy, reservation_at, table};

    async fn book(
        db: &DatabaseConnection,
        restaurant_id: Uuid,
        fields: ReservationFields,
    ) -> Result<reservation::Model, ServiceError> {
        create_reservation(db, &policy(), restaurant_id, fields).await
    }

    async fn edit(
        db: &DatabaseConnection,
        restaurant_id: Uuid,
        id: Uuid,
        fields: ReservationFields,
    ) -> Result<reservation::Model, ServiceError> {
        update_reservation(db, &policy(), restaurant_id, id, fields).await
    }

    #[test]
    fn policy_bounds_future_dates_only() {
        let p = ReservationPolicy::default();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
        assert!(p.check_date(today + Duration::days(90), today).is_ok());
        assert!(p.check_date(today - Duration::days(400), today).is_ok());
        assert!(matches!(
            p.check_date(today + Duration::days(91), today),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn huge_horizon_means_no_upper_bound() {
        let p = ReservationPolicy {
            max_days_ahead: 1_000_000_000,
            duration_minutes: 120,
        };
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
        assert_eq!(p.latest_date(today), None);
        assert!(p.check_date(NaiveDate::MAX, today).is_ok());
        assert!(p.check_date(today + Duration::days(5000), today).is_ok());
    }

    #[test]
    fn seatings_overlap_within_duration() {
        let p = ReservationPolicy {
            max_days_ahead: 90,
            duration_minutes: 120,
        };
        assert!(p.overlaps(19 * 60, 20 * 60 + 59));
        assert!(!p.overlaps(18 * 60, 20 * 60));
    }

    #[tokio::test]
    async fn john_doe_example_flow() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;
        let john = reservation_at("John Doe", "2024-01-15", "19:00", 4, None);
        let res = book(&db, r.id, john).await?;
        let jane = reservation_at("Jane Roe", "2024-01-16", "19:00", 2, None);
        book(&db, r.id, jane).await?;

        let filter = ReservationFilter {
            date: NaiveDate::from_ymd_opt(2024, 1, 15),
            ..Default::default()
        };
        let found = list_reservations(&db, r.id, &filter).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, res.id);
        assert_eq!(found[0].customer_name, "John Doe");
        assert_eq!(found[0].status, ReservationStatus::Pending);
        Ok(())
    }

    #[tokio::test]
    async fn confirm_and_cancel_transitions() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;
        let ann = reservation_at("Ann", "2024-03-01", "18:00", 2, None);
        let res = book(&db, r.id, ann).await?;

        let confirmed = confirm_reservation(&db, r.id, res.id).await?;
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);
        assert!(confirmed.updated_at > res.updated_at);

        let again = confirm_reservation(&db, r.id, res.id).await?;
        assert_eq!(again.updated_at, confirmed.updated_at);

        let cancelled = cancel_reservation(&db, r.id, res.id).await?;
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        assert!(matches!(
            confirm_reservation(&db, r.id, res.id).await,
            Err(ServiceError::InvalidState(_))
        ));

        let filter = ReservationFilter {
            status: Some(ReservationStatus::Cancelled),
            ..Default::default()
        };
        let by_status = list_reservations(&db, r.id, &filter).await?;
        assert_eq!(by_status.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn overlapping_bookings_on_one_table_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;
        let t = create_table(&db, r.id, table(5, 4)).await?;

        let seat = |name, date, time| reservation_at(name, date, time, 2, Some(t.id));
        let first = book(&db, r.id, seat("A", "2024-05-01", "19:00")).await?;
        let clash = book(&db, r.id, seat("B", "2024-05-01", "20:00")).await;
        assert!(matches!(clash, Err(ServiceError::Conflict(_))));

        // next seating and another day are fine
        book(&db, r.id, seat("C", "2024-05-01", "21:00")).await?;
        book(&db, r.id, seat("D", "2024-05-02", "19:30")).await?;

        // a cancelled booking releases the table
        cancel_reservation(&db, r.id, first.id).await?;
        book(&db, r.id, seat("E", "2024-05-01", "19:00")).await?;
        Ok(())
    }

    #[tokio::test]
    async fn table_must_fit_and_belong_to_the_restaurant() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;
        let other = create_restaurant(&db, gourmet_kitchen()).await?;
        let small = create_table(&db, r.id, table(1, 2)).await?;
        let foreign = create_table(&db, other.id, table(1, 8)).await?;

        let big = reservation_at("Big", "2024-06-01", "19:00", 6, Some(small.id));
        let refused = book(&db, r.id, big).await;
        assert!(matches!(refused, Err(ServiceError::Validation(f)) if f.contains("party_size")));

        let lost = reservation_at("Lost", "2024-06-01", "19:00", 2, Some(foreign.id));
        let wrong = book(&db, r.id, lost).await;
        assert!(matches!(wrong, Err(ServiceError::Validation(ref f)) if f.contains("table_id")));
        Ok(())
    }

    #[tokio::test]
    async fn update_merges_and_respects_lifecycle() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;
        let kim = reservation_at("Kim", "2024-07-01", "18:30", 3, None);
        let res = book(&db, r.id, kim).await?;

        let changes = ReservationFields {
            time: Some("20:15".into()),
            special_requests: Some("Birthday cake".into()),
            ..Default::default()
        };
        let moved = edit(&db, r.id, res.id, changes).await?;
        assert_eq!(moved.time, "20:15");
        assert_eq!(moved.party_size, 3);
        assert_eq!(moved.special_requests.as_deref(), Some("Birthday cake"));
        assert!(moved.updated_at > res.updated_at);

        let confirm = ReservationFields {
            status: Some("confirmed".into()),
            ..Default::default()
        };
        edit(&db, r.id, res.id, confirm).await?;
        let reopen = ReservationFields {
            status: Some("pending".into()),
            ..Default::default()
        };
        let back = edit(&db, r.id, res.id, reopen).await;
        assert!(matches!(back, Err(ServiceError::InvalidState(_))));

        let far = (Utc::now().date_naive() + Duration::days(365)).format("%Y-%m-%d").to_string();
        let later = ReservationFields {
            date: Some(far),
            ..Default::default()
        };
        let too_far = edit(&db, r.id, res.id, later).await;
        assert!(matches!(too_far, Err(ServiceError::Validation(ref f)) if f.contains("date")));
        Ok(())
    }

    #[tokio::test]
    async fn cancelling_through_update_skips_table_rules() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;
        let t = create_table(&db, r.id, table(1, 4)).await?;
        let res = create_reservation(
            &db,
            &policy(),
            r.id,
            reservation_at("Lee", "2024-08-01", "19:00", 4, Some(t.id)),
        )
        .await?;
        let shrink = TableFields {
            capacity: Some(2),
            ..Default::default()
        };
        update_table(&db, r.id, t.id, shrink).await?;

        // unrelated edits do not re-measure the party against the table
        let noted = update_reservation(
            &db,
            &policy(),
            r.id,
            res.id,
            ReservationFields {
                special_requests: Some("Window".into()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(noted.special_requests.as_deref(), Some("Window"));

        let cancelled = update_reservation(
            &db,
            &policy(),
            r.id,
            res.id,
            ReservationFields {
                status: Some("cancelled".into()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);

        // growing the party still has to fit
        let other = create_reservation(
            &db,
            &policy(),
            r.id,
            reservation_at("Max", "2024-08-01", "19:00", 2, Some(t.id)),
        )
        .await?;
        let grown = update_reservation(
            &db,
            &policy(),
            r.id,
            other.id,
            ReservationFields {
                party_size: Some(3),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(grown, Err(ServiceError::Validation(ref f)) if f.contains("party_size")));
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_bookings_for_one_table_admit_only_one() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;
        let t = create_table(&db, r.id, table(3, 4)).await?;
        let p = policy();

        let (a, b) = tokio::join!(
            create_reservation(
                &db,
                &p,
                r.id,
                reservation_at("A", "2024-09-01", "19:00", 2, Some(t.id)),
            ),
            create_reservation(
                &db,
                &p,
                r.id,
                reservation_at("B", "2024-09-01", "19:30", 2, Some(t.id)),
            ),
        );
        let admitted = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(admitted, 1);
        let conflicts = [&a, &b]
            .iter()
            .filter(|outcome| matches!(outcome, Err(ServiceError::Conflict(_))))
            .count();
        assert_eq!(conflicts, 1);

        let filter = ReservationFilter::default();
        assert_eq!(list_reservations(&db, r.id, &filter).await?.len(), 1);
        Ok(())
    }
}
