use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::restaurant;
use crate::validate::{Checker, NAME_MAX, TEXT_MAX};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
}

/// Ordered item list, stored as one JSON column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct MenuItems(pub Vec<MenuItem>);

impl MenuItems {
    pub fn iter(&self) -> impl Iterator<Item = &MenuItem> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub items: MenuItems,
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
pub struct MenuItemFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub dietary_tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub items: Option<Vec<MenuItemFields>>,
}

/// Items are always complete objects, in create and in update alike.
fn check_items(c: &mut Checker, items: Vec<MenuItemFields>) -> Option<MenuItems> {
    let mut out = Vec::with_capacity(items.len());
    let mut ok = true;
    for (i, item) in items.into_iter().enumerate() {
        let prefix = format!("items[{i}]");
        let name = c.text(&format!("{prefix}.name"), item.name, NAME_MAX);
        let description =
            c.optional_text(&format!("{prefix}.description"), item.description, TEXT_MAX);
        let category = c.optional_text(&format!("{prefix}.category"), item.category, NAME_MAX);
        let price = match item.price {
            None => {
                c.invalid(&format!("{prefix}.price"), "is required");
                None
            }
            Some(p) if p.is_sign_negative() && !p.is_zero() => {
                c.invalid(&format!("{prefix}.price"), "must be >= 0");
                None
            }
            Some(p) => Some(p),
        };
        let dietary_tags: Vec<String> = item
            .dietary_tags
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        match (name, price) {
            (Some(name), Some(price)) => out.push(MenuItem {
                name,
                description: description.flatten(),
                price,
                category: category.flatten(),
                dietary_tags,
            }),
            _ => ok = false,
        }
    }
    ok.then_some(MenuItems(out))
}

impl MenuFields {
    pub fn into_model(
        self,
        restaurant_id: Uuid,
        now: DateTimeWithTimeZone,
    ) -> Result<Model, ModelError> {
        let mut c = Checker::for_create();
        let name = c.text("name", self.name, NAME_MAX);
        let description = c.optional_text("description", self.description, TEXT_MAX);
        let items = check_items(&mut c, self.items.unwrap_or_default());
        c.finish()?;

        Ok(Model {
            id: Uuid::new_v4(),
            restaurant_id,
            name: name.unwrap_or_default(),
            description: description.flatten(),
            items: items.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_to(self, model: &mut Model) -> Result<(), ModelError> {
        let mut c = Checker::for_patch();
        let name = c.text("name", self.name, NAME_MAX);
        let description = c.optional_text("description", self.description, TEXT_MAX);
        let items = self.items.and_then(|items| check_items(&mut c, items));
        c.finish()?;

        if let Some(v) = name {
            model.name = v;
        }
        if let Some(v) = description {
            model.description = v;
        }
        if let Some(v) = items {
            model.items = v;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock;
    use rust_decimal::prelude::FromPrimitive;

    fn item(name: &str, price: f64) -> MenuItemFields {
        MenuItemFields {
            name: Some(name.into()),
            price: Decimal::from_f64(price),
            ..Default::default()
        }
    }

    #[test]
    fn items_keep_order_and_default_tags() {
        let fields = MenuFields {
            name: Some("Dinner".into()),
            items: Some(vec![item("Soup", 6.5), item("Steak", 28.0), item("Water", 0.0)]),
            ..Default::default()
        };
        let m = fields.into_model(Uuid::new_v4(), clock::now()).expect("valid");
        let names: Vec<_> = m.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Soup", "Steak", "Water"]);
        assert!(m.items.iter().all(|i| i.dietary_tags.is_empty()));
    }

    #[test]
    fn item_errors_point_at_the_item() {
        let fields = MenuFields {
            name: Some("Lunch".into()),
            items: Some(vec![
                item("Salad", 9.0),
                MenuItemFields {
                    name: Some("Pie".into()),
                    ..Default::default()
                },
                item("Refund", -1.0),
            ]),
            ..Default::default()
        };
        match fields.into_model(Uuid::new_v4(), clock::now()) {
            Err(ModelError::Validation(errs)) => {
                let got: Vec<_> = errs.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(got, ["items[1].price", "items[2].price"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn items_round_trip_through_json_with_numeric_prices() {
        let json = serde_json::json!([{"name": "Tea", "price": 3.25, "dietary_tags": ["vegan"]}]);
        let items: MenuItems = serde_json::from_value(json).expect("parse");
        assert_eq!(items.0[0].price, Decimal::new(325, 2));
        let back = serde_json::to_value(&items).expect("serialize");
        assert_eq!(back[0]["price"], serde_json::json!(3.25));
    }

    #[test]
    fn patch_replaces_items_wholesale() {
        let brunch = MenuFields {
            name: Some("Brunch".into()),
            items: Some(vec![item("Eggs", 8.0)]),
            ..Default::default()
        };
        let mut m = brunch.into_model(Uuid::new_v4(), clock::now()).expect("valid");
        let replace = MenuFields {
            items: Some(vec![item("Waffles", 7.0), item("Coffee", 3.0)]),
            ..Default::default()
        };
        replace.apply_to(&mut m).expect("patch");
        assert_eq!(m.name, "Brunch");
        assert_eq!(m.items.len(), 2);
        assert_eq!(m.items.0[0].name, "Waffles");
    }
}
