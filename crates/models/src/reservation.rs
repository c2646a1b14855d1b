use chrono::{NaiveDate, NaiveTime};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::validate::{parse_time, Checker, NAME_MAX, TEXT_MAX};
use crate::{dining_table, restaurant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Unchanged,
    Allowed,
    Forbidden,
}

impl ReservationStatus {
    pub const EXPECTED: &'static str = "pending, confirmed, cancelled";

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Pending may become confirmed or cancelled, confirmed may become cancelled.
    pub fn change_to(self, next: Self) -> StatusChange {
        use ReservationStatus::*;
        match (self, next) {
            (a, b) if a == b => StatusChange::Unchanged,
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) => {
                StatusChange::Allowed
            }
            _ => StatusChange::Forbidden,
        }
    }

    /// Whether the reservation still occupies its table.
    pub fn holds_table(self) -> bool {
        self != Self::Cancelled
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub date: Date,
    pub time: String,
    pub party_size: i32,
    pub status: ReservationStatus,
    pub table_id: Option<Uuid>,
    pub special_requests: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Start time; `time` is always stored as a valid `HH:MM`.
    pub fn start_time(&self) -> Option<NaiveTime> {
        parse_time(&self.time)
    }

    /// Minutes since midnight of the start time.
    pub fn start_minute(&self) -> Option<i64> {
        use chrono::Timelike;
        self.start_time().map(|t| i64::from(t.hour()) * 60 + i64::from(t.minute()))
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Restaurant,
    DiningTable,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Restaurant => Entity::belongs_to(restaurant::Entity)
                .from(Column::RestaurantId)
                .to(restaurant::Column::Id)
                .into(),
            Relation::DiningTable => Entity::belongs_to(dining_table::Entity)
                .from(Column::TableId)
                .to(dining_table::Column::Id)
                .into(),
        }
    }
}

impl Related<restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Reservation payload. Date, time, status and table id arrive as strings and
/// are parsed here so a bad value becomes a field error, not a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationFields {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub party_size: Option<i32>,
    pub status: Option<String>,
    pub table_id: Option<String>,
    pub special_requests: Option<String>,
}

impl ReservationFields {
    pub fn into_model(
        self,
        restaurant_id: Uuid,
        now: DateTimeWithTimeZone,
    ) -> Result<Model, ModelError> {
        let mut c = Checker::for_create();
        let customer_name = c.text("customer_name", self.customer_name, NAME_MAX);
        let customer_email = c.optional_email("customer_email", self.customer_email);
        let customer_phone = c.optional_phone("customer_phone", self.customer_phone);
        let date = c.date("date", self.date);
        let time = c.time("time", self.time);
        let party_size = c.positive("party_size", self.party_size);
        let status = self.status.and_then(|s| {
            c.parsed(
                "status",
                Some(s),
                ReservationStatus::EXPECTED,
                ReservationStatus::parse,
            )
        });
        if status == Some(ReservationStatus::Cancelled) {
            c.invalid("status", "a new reservation must be pending or confirmed");
        }
        let table_id = c.optional_uuid("table_id", self.table_id);
        let special_requests = c.optional_text("special_requests", self.special_requests, TEXT_MAX);
        c.finish()?;

        Ok(Model {
            id: Uuid::new_v4(),
            restaurant_id,
            customer_name: customer_name.unwrap_or_default(),
            customer_email: customer_email.flatten(),
            customer_phone: customer_phone.flatten(),
            date: date.unwrap_or(NaiveDate::MIN),
            time: time.unwrap_or_default(),
            party_size: party_size.unwrap_or_default(),
            status: status.unwrap_or_default(),
            table_id: table_id.flatten(),
            special_requests: special_requests.flatten(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Merge supplied fields into `model`. A status change must be a legal transition.
    pub fn apply_to(self, model: &mut Model) -> Result<(), ModelError> {
        let mut c = Checker::for_patch();
        let customer_name = c.text("customer_name", self.customer_name, NAME_MAX);
        let customer_email = c.optional_email("customer_email", self.customer_email);
        let customer_phone = c.optional_phone("customer_phone", self.customer_phone);
        let date = c.date("date", self.date);
        let time = c.time("time", self.time);
        let party_size = c.positive("party_size", self.party_size);
        let status = c.parsed(
            "status",
            self.status,
            ReservationStatus::EXPECTED,
            ReservationStatus::parse,
        );
        let table_id = c.optional_uuid("table_id", self.table_id);
        let special_requests = c.optional_text("special_requests", self.special_requests, TEXT_MAX);
        c.finish()?;

        if let Some(next) = status {
            transition(model, next)?;
        }
        if let Some(v) = customer_name {
            model.customer_name = v;
        }
        if let Some(v) = customer_email {
            model.customer_email = v;
        }
        if let Some(v) = customer_phone {
            model.customer_phone = v;
        }
        if let Some(v) = date {
            model.date = v;
        }
        if let Some(v) = time {
            model.time = v;
        }
        if let Some(v) = party_size {
            model.party_size = v;
        }
        if let Some(v) = table_id {
            model.table_id = v;
        }
        if let Some(v) = special_requests {
            model.special_requests = v;
        }
        Ok(())
    }
}

/// Move `model` to `next`. Returns whether anything changed.
pub fn transition(model: &mut Model, next: ReservationStatus) -> Result<bool, ModelError> {
    match model.status.change_to(next) {
        StatusChange::Unchanged => Ok(false),
        StatusChange::Allowed => {
            model.status = next;
            Ok(true)
        }
        StatusChange::Forbidden => Err(ModelError::InvalidState(format!(
            "cannot change reservation from {} to {}",
            model.status.as_str(),
            next.as_str()
        ))),
    }
}
