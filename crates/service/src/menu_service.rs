use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use models::menu::{self, MenuFields};
use models::{clock, patch};

use crate::errors::ServiceError;
use crate::restaurant_service::require_restaurant;

pub async fn create_menu<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    fields: MenuFields,
) -> Result<menu::Model, ServiceError> {
    require_restaurant(db, restaurant_id).await?;
    let model = fields.into_model(restaurant_id, clock::now())?;
    Ok(menu::ActiveModel::from(model).reset_all().insert(db).await?)
}

/// A menu of another restaurant is reported as absent.
pub async fn get_menu<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
) -> Result<menu::Model, ServiceError> {
    require_restaurant(db, restaurant_id).await?;
    menu::Entity::find_by_id(id)
        .filter(menu::Column::RestaurantId.eq(restaurant_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("menu"))
}

pub async fn list_menus<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
) -> Result<Vec<menu::Model>, ServiceError> {
    require_restaurant(db, restaurant_id).await?;
    Ok(menu::Entity::find()
        .filter(menu::Column::RestaurantId.eq(restaurant_id))
        .order_by_asc(menu::Column::CreatedAt)
        .order_by_asc(menu::Column::Id)
        .all(db)
        .await?)
}

pub async fn update_menu<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
    fields: MenuFields,
) -> Result<menu::Model, ServiceError> {
    let current = get_menu(db, restaurant_id, id).await?;
    let mut next = current.clone();
    fields.apply_to(&mut next)?;
    next.updated_at = clock::after(&current.updated_at);
    Ok(patch::changed_columns::<menu::Entity>(&current, &next).update(db).await?)
}

pub async fn delete_menu<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
) -> Result<(), ServiceError> {
    get_menu(db, restaurant_id, id).await?;
    menu::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restaurant_service::create_restaurant;
    use crate::test_support::{get_db, gourmet_kitchen, menu_item};

    #[tokio::test]
    async fn menu_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;

        let m = create_menu(&db, r.id, MenuFields {
            name: Some("Dinner".into()),
            description: Some("Evening menu".into()),
            items: Some(vec![
                menu_item("Soup", 650, "Starters"),
                menu_item("Steak", 2800, "Mains"),
            ]),
        })
        .await?;
        assert_eq!(m.items.len(), 2);
        assert_eq!(m.restaurant_id, r.id);

        let cleared = MenuFields {
            description: Some(String::new()),
            ..Default::default()
        };
        let updated = update_menu(&db, r.id, m.id, cleared).await?;
        assert_eq!(updated.description, None);
        assert_eq!(updated.items, m.items);
        assert!(updated.updated_at > m.updated_at);

        assert_eq!(list_menus(&db, r.id).await?.len(), 1);
        delete_menu(&db, r.id, m.id).await?;
        assert!(matches!(get_menu(&db, r.id, m.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn menus_are_scoped_to_their_restaurant() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = create_restaurant(&db, gourmet_kitchen()).await?;
        let b = create_restaurant(&db, gourmet_kitchen()).await?;
        let lunch = MenuFields {
            name: Some("Lunch".into()),
            ..Default::default()
        };
        let m = create_menu(&db, a.id, lunch).await?;

        assert!(matches!(get_menu(&db, b.id, m.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(delete_menu(&db, b.id, m.id).await, Err(ServiceError::NotFound(_))));
        assert!(list_menus(&db, b.id).await?.is_empty());
        assert!(matches!(list_menus(&db, Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));
        let ghost = MenuFields {
            name: Some("Ghost".into()),
            ..Default::default()
        };
        assert!(matches!(
            create_menu(&db, Uuid::new_v4(), ghost).await,
            Err(ServiceError::NotFound(_))
        ));
        Ok(())
    }
}
