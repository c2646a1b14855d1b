use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::restaurant;
use crate::validate::{Checker, NAME_MAX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[default]
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "occupied")]
    Occupied,
    #[sea_orm(string_value = "reserved")]
    Reserved,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
}

impl TableStatus {
    pub const EXPECTED: &'static str = "available, occupied, reserved, maintenance";

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Some(Self::Available),
            "occupied" => Some(Self::Occupied),
            "reserved" => Some(Self::Reserved),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dining_table")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub table_number: i32,
    pub capacity: i32,
    pub location: Option<String>,
    pub status: TableStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Restaurant,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Restaurant => Entity::belongs_to(restaurant::Entity)
                .from(Column::RestaurantId)
                .to(restaurant::Column::Id)
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

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableFields {
    pub table_number: Option<i32>,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub status: Option<String>,
}

impl TableFields {
    pub fn into_model(
        self,
        restaurant_id: Uuid,
        now: DateTimeWithTimeZone,
    ) -> Result<Model, ModelError> {
        let mut c = Checker::for_create();
        let table_number = c.positive("table_number", self.table_number);
        let capacity = c.positive("capacity", self.capacity);
        let location = c.optional_text("location", self.location, NAME_MAX);
        let status = self.status.and_then(|s| {
            c.parsed(
                "status",
                Some(s),
                TableStatus::EXPECTED,
                TableStatus::parse,
            )
        });
        c.finish()?;

        Ok(Model {
            id: Uuid::new_v4(),
            restaurant_id,
            table_number: table_number.unwrap_or_default(),
            capacity: capacity.unwrap_or_default(),
            location: location.flatten(),
            status: status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_to(self, model: &mut Model) -> Result<(), ModelError> {
        let mut c = Checker::for_patch();
        let table_number = c.positive("table_number", self.table_number);
        let capacity = c.positive("capacity", self.capacity);
        let location = c.optional_text("location", self.location, NAME_MAX);
        let status = c.parsed(
            "status",
            self.status,
            TableStatus::EXPECTED,
            TableStatus::parse,
        );
        c.finish()?;

        if let Some(v) = table_number {
            model.table_number = v;
        }
        if let Some(v) = capacity {
            model.capacity = v;
        }
        if let Some(v) = location {
            model.location = v;
        }
        if let Some(v) = status {
            model.status = v;
        }
        Ok(())
    }
}
