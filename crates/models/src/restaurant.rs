use std::collections::BTreeMap;

use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::validate::{parse_time, Checker, NAME_MAX, TEXT_MAX};
use crate::{dining_table, menu, reservation, staff};

pub const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Weekday (lowercase) to `"HH:MM-HH:MM"` or `"closed"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct OpeningHours(pub BTreeMap<String, String>);

impl OpeningHours {
    /// Normalised copy, or `None` after recording errors. An empty map clears the hours.
    fn checked(self, c: &mut Checker) -> Option<Option<OpeningHours>> {
        let mut out = BTreeMap::new();
        let mut ok = true;
        for (day, span) in self.0 {
            let day = day.trim().to_ascii_lowercase();
            let span = span.trim().to_ascii_lowercase();
            let field = format!("opening_hours.{day}");
            if !WEEKDAYS.contains(&day.as_str()) {
                c.invalid(&field, "is not a weekday");
                ok = false;
                continue;
            }
            let valid = span == "closed"
                || span.split_once('-').is_some_and(|(open, close)| {
                    parse_time(open).is_some() && parse_time(close).is_some()
                });
            if !valid {
                c.invalid(&field, "must be HH:MM-HH:MM or closed");
                ok = false;
                continue;
            }
            out.insert(day, span);
        }
        if !ok {
            return None;
        }
        Some(if out.is_empty() {
            None
        } else {
            Some(OpeningHours(out))
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub cuisine_type: Option<String>,
    pub opening_hours: Option<OpeningHours>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Menu,
    DiningTable,
    Staff,
    Reservation,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Menu => Entity::has_many(menu::Entity).into(),
            Relation::DiningTable => Entity::has_many(dining_table::Entity).into(),
            Relation::Staff => Entity::has_many(staff::Entity).into(),
            Relation::Reservation => Entity::has_many(reservation::Entity).into(),
        }
    }
}

impl Related<menu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Menu.def()
    }
}

impl Related<dining_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiningTable.def()
    }
}

impl Related<staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl Related<reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Restaurant payload. Every field is optional so the same type serves create and update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantFields {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub cuisine_type: Option<String>,
    pub opening_hours: Option<OpeningHours>,
}

impl RestaurantFields {
    pub fn into_model(self, now: DateTimeWithTimeZone) -> Result<Model, ModelError> {
        let mut c = Checker::for_create();
        let name = c.text("name", self.name, NAME_MAX);
        let address = c.text("address", self.address, TEXT_MAX);
        let phone = c.phone("phone", self.phone);
        let email = c.email("email", self.email);
        let cuisine_type = c.optional_text("cuisine_type", self.cuisine_type, NAME_MAX);
        let opening_hours = self.opening_hours.and_then(|h| h.checked(&mut c));
        c.finish()?;

        // finish() guarantees the required fields are present
        Ok(Model {
            id: Uuid::new_v4(),
            name: name.unwrap_or_default(),
            address: address.unwrap_or_default(),
            phone: phone.unwrap_or_default(),
            email: email.unwrap_or_default(),
            cuisine_type: cuisine_type.flatten(),
            opening_hours: opening_hours.flatten(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_to(self, model: &mut Model) -> Result<(), ModelError> {
        let mut c = Checker::for_patch();
        let name = c.text("name", self.name, NAME_MAX);
        let address = c.text("address", self.address, TEXT_MAX);
        let phone = c.phone("phone", self.phone);
        let email = c.email("email", self.email);
        let cuisine_type = c.optional_text("cuisine_type", self.cuisine_type, NAME_MAX);
        let opening_hours = self.opening_hours.and_then(|h| h.checked(&mut c));
        c.finish()?;

        if let Some(v) = name {
            model.name = v;
        }
        if let Some(v) = address {
            model.address = v;
        }
        if let Some(v) = phone {
            model.phone = v;
        }
        if let Some(v) = email {
            model.email = v;
        }
        if let Some(v) = cuisine_type {
            model.cuisine_type = v;
        }
        if let Some(v) = opening_hours {
            model.opening_hours = v;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock;

    fn gourmet() -> RestaurantFields {
        RestaurantFields {
            name: Some("The Gourmet Kitchen".into()),
            address: Some("123 Main St".into()),
            phone: Some("+1-555-0123".into()),
            email: Some("info@gourmet.example".into()),
            ..Default::default()
        }
    }

    #[test]
    fn create_stamps_equal_timestamps() {
        let now = clock::now();
        let m = gourmet().into_model(now).expect("valid");
        assert_eq!(m.created_at, m.updated_at);
        assert_eq!(m.name, "The Gourmet Kitchen");
        assert!(m.opening_hours.is_none());
    }

    #[test]
    fn create_lists_all_missing_fields() {
        let err = RestaurantFields::default().into_model(clock::now()).unwrap_err();
        match err {
            ModelError::Validation(errs) => {
                let fields: Vec<_> = errs.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, ["name", "address", "phone", "email"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn opening_hours_are_normalised_and_checked() {
        let mut hours = BTreeMap::new();
        hours.insert("Monday".to_string(), "11:00-22:00".to_string());
        hours.insert("sunday".to_string(), "Closed".to_string());
        let fields = RestaurantFields {
            opening_hours: Some(OpeningHours(hours)),
            ..gourmet()
        };
        let m = fields.into_model(clock::now()).expect("valid");
        let h = m.opening_hours.expect("hours");
        assert_eq!(h.0.get("monday").map(String::as_str), Some("11:00-22:00"));
        assert_eq!(h.0.get("sunday").map(String::as_str), Some("closed"));

        let mut bad = BTreeMap::new();
        bad.insert("funday".to_string(), "10:00-11:00".to_string());
        bad.insert("friday".to_string(), "late".to_string());
        let err = RestaurantFields {
            opening_hours: Some(OpeningHours(bad)),
            ..gourmet()
        }
        .into_model(clock::now())
        .unwrap_err();
        let ModelError::Validation(errs) = err else {
            panic!("expected validation errors");
        };
        assert!(errs.contains("opening_hours.friday"));
        assert!(errs.contains("opening_hours.funday"));
    }

    #[test]
    fn patch_touches_only_supplied_fields() {
        let mut m = gourmet().into_model(clock::now()).expect("valid");
        let before = m.clone();
        RestaurantFields {
            phone: Some("555 0199".into()),
            cuisine_type: Some("French".into()),
            ..Default::default()
        }
        .apply_to(&mut m)
        .expect("patch");
        assert_eq!(m.phone, "555 0199");
        assert_eq!(m.cuisine_type.as_deref(), Some("French"));
        assert_eq!(m.name, before.name);
        assert_eq!(m.email, before.email);

        let broken = RestaurantFields {
            email: Some("broken".into()),
            ..Default::default()
        };
        let err = broken.apply_to(&mut m);
        assert!(err.is_err());
        assert_eq!(m.email, before.email);
    }
}
