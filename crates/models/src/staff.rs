use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::restaurant;
use crate::validate::{Checker, NAME_MAX};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub shift: Option<String>,
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
pub struct StaffFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub shift: Option<String>,
}

impl StaffFields {
    pub fn into_model(
        self,
        restaurant_id: Uuid,
        now: DateTimeWithTimeZone,
    ) -> Result<Model, ModelError> {
        let mut c = Checker::for_create();
        let name = c.text("name", self.name, NAME_MAX);
        let email = c.email("email", self.email);
        let role = c.text("role", self.role, NAME_MAX);
        let phone = c.optional_phone("phone", self.phone);
        let shift = c.optional_text("shift", self.shift, NAME_MAX);
        c.finish()?;

        Ok(Model {
            id: Uuid::new_v4(),
            restaurant_id,
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            role: role.unwrap_or_default(),
            phone: phone.flatten(),
            shift: shift.flatten(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_to(self, model: &mut Model) -> Result<(), ModelError> {
        let mut c = Checker::for_patch();
        let name = c.text("name", self.name, NAME_MAX);
        let email = c.email("email", self.email);
        let role = c.text("role", self.role, NAME_MAX);
        let phone = c.optional_phone("phone", self.phone);
        let shift = c.optional_text("shift", self.shift, NAME_MAX);
        c.finish()?;

        if let Some(v) = name {
            model.name = v;
        }
        if let Some(v) = email {
            model.email = v;
        }
        if let Some(v) = role {
            model.role = v;
        }
        if let Some(v) = phone {
            model.phone = v;
        }
        if let Some(v) = shift {
            model.shift = v;
        }
        Ok(())
    }
}
