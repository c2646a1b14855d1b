use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use models::restaurant::{self, RestaurantFields};
use models::{clock, dining_table, menu, patch, reservation, staff};

use crate::errors::ServiceError;

/// Create a restaurant.
pub async fn create_restaurant<C: ConnectionTrait>(
    db: &C,
    fields: RestaurantFields,
) -> Result<restaurant::Model, ServiceError> {
    let model = fields.into_model(clock::now())?;
    let created = restaurant::ActiveModel::from(model).reset_all().insert(db).await?;
    Ok(created)
}

/// Get restaurant by id.
pub async fn get_restaurant<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<restaurant::Model, ServiceError> {
    restaurant::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("restaurant"))
}

/// Fails with `NotFound` unless the restaurant exists. Used before touching a child collection.
pub async fn require_restaurant<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(), ServiceError> {
    get_restaurant(db, id).await.map(|_| ())
}

/// All restaurants in creation order.
pub async fn list_restaurants<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<restaurant::Model>, ServiceError> {
    Ok(restaurant::Entity::find()
        .order_by_asc(restaurant::Column::CreatedAt)
        .order_by_asc(restaurant::Column::Id)
        .all(db)
        .await?)
}

/// Merge the supplied fields.
pub async fn update_restaurant<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    fields: RestaurantFields,
) -> Result<restaurant::Model, ServiceError> {
    let current = get_restaurant(db, id).await?;
    let mut next = current.clone();
    fields.apply_to(&mut next)?;
    next.updated_at = clock::after(&current.updated_at);
    let updated = patch::changed_columns::<restaurant::Entity>(&current, &next).update(db).await?;
    Ok(updated)
}

/// Delete a restaurant together with its menus, tables, staff and reservations.
pub async fn delete_restaurant<C: TransactionTrait>(db: &C, id: Uuid) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    require_restaurant(&txn, id).await?;

    let reservations = reservation::Entity::delete_many()
        .filter(reservation::Column::RestaurantId.eq(id))
        .exec(&txn)
        .await?;
    let tables = dining_table::Entity::delete_many()
        .filter(dining_table::Column::RestaurantId.eq(id))
        .exec(&txn)
        .await?;
    let staff = staff::Entity::delete_many()
        .filter(staff::Column::RestaurantId.eq(id))
        .exec(&txn)
        .await?;
    let menus = menu::Entity::delete_many()
        .filter(menu::Column::RestaurantId.eq(id))
        .exec(&txn)
        .await?;
    restaurant::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    info!(
        restaurant_id = %id,
        menus = menus.rows_affected,
        tables = tables.rows_affected,
        staff = staff.rows_affected,
        reservations = reservations.rows_affected,
        "restaurant_deleted_with_children"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, gourmet_kitchen};
    use models::staff::StaffFields;

    #[tokio::test]
    async fn restaurant_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let r = create_restaurant(&db, gourmet_kitchen()).await?;
        assert_eq!(r.name, "The Gourmet Kitchen");
        assert_eq!(r.created_at, r.updated_at);

        let found = get_restaurant(&db, r.id).await?;
        assert_eq!(found, r);

        let renamed = RestaurantFields {
            name: Some("Gourmet Kitchen II".into()),
            ..Default::default()
        };
        let updated = update_restaurant(&db, r.id, renamed).await?;
        assert_eq!(updated.name, "Gourmet Kitchen II");
        assert_eq!(updated.address, r.address);
        assert_eq!(updated.created_at, r.created_at);
        assert!(updated.updated_at > r.updated_at);

        delete_restaurant(&db, r.id).await?;
        assert!(matches!(get_restaurant(&db, r.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(delete_restaurant(&db, r.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn empty_update_still_advances_updated_at() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;

        let touched = update_restaurant(&db, r.id, RestaurantFields::default()).await?;
        assert_eq!(touched.name, r.name);
        assert!(touched.updated_at > r.updated_at);
        assert_eq!(get_restaurant(&db, r.id).await?.updated_at, touched.updated_at);
        Ok(())
    }

    #[tokio::test]
    async fn list_keeps_creation_order() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        for name in ["Alpha", "Bravo", "Charlie"] {
            let fields = RestaurantFields {
                name: Some(name.into()),
                ..gourmet_kitchen()
            };
            create_restaurant(&db, fields).await?;
        }
        let names: Vec<_> = list_restaurants(&db).await?.into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["Alpha", "Bravo", "Charlie"]);
        Ok(())
    }

    #[tokio::test]
    async fn delete_cascades_to_children() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;
        let other = create_restaurant(&db, gourmet_kitchen()).await?;
        for rid in [r.id, other.id] {
            let chef = StaffFields {
                name: Some("Ana".into()),
                email: Some("ana@example.com".into()),
                role: Some("Chef".into()),
                ..Default::default()
            };
            crate::staff_service::create_staff(&db, rid, chef).await?;
        }

        delete_restaurant(&db, r.id).await?;
        let left = staff::Entity::find().all(&db).await?;
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].restaurant_id, other.id);
        Ok(())
    }

    #[tokio::test]
    async fn update_validates_supplied_fields_only() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;
        let bad = RestaurantFields {
            email: Some("no-at-sign".into()),
            ..Default::default()
        };
        let err = update_restaurant(&db, r.id, bad).await;
        assert!(matches!(err, Err(ServiceError::Validation(ref f)) if f.contains("email")));
        assert!(matches!(err, Err(ServiceError::Validation(ref f)) if f.len() == 1));
        assert_eq!(get_restaurant(&db, r.id).await?, r);
        Ok(())
    }
}
