use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use models::staff::{self, StaffFields};
use models::{clock, patch};

use crate::errors::ServiceError;
use crate::restaurant_service::require_restaurant;

pub async fn create_staff<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    fields: StaffFields,
) -> Result<staff::Model, ServiceError> {
    require_restaurant(db, restaurant_id).await?;
    let model = fields.into_model(restaurant_id, clock::now())?;
    Ok(staff::ActiveModel::from(model).reset_all().insert(db).await?)
}

pub async fn get_staff<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
) -> Result<staff::Model, ServiceError> {
    require_restaurant(db, restaurant_id).await?;
    staff::Entity::find_by_id(id)
        .filter(staff::Column::RestaurantId.eq(restaurant_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("staff member"))
}

pub async fn list_staff<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
) -> Result<Vec<staff::Model>, ServiceError> {
    require_restaurant(db, restaurant_id).await?;
    Ok(staff::Entity::find()
        .filter(staff::Column::RestaurantId.eq(restaurant_id))
        .order_by_asc(staff::Column::CreatedAt)
        .order_by_asc(staff::Column::Id)
        .all(db)
        .await?)
}

pub async fn update_staff<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
    fields: StaffFields,
) -> Result<staff::Model, ServiceError> {
    let current = get_staff(db, restaurant_id, id).await?;
    let mut next = current.clone();
    fields.apply_to(&mut next)?;
    next.updated_at = clock::after(&current.updated_at);
    Ok(patch::changed_columns::<staff::Entity>(&current, &next).update(db).await?)
}

pub async fn delete_staff<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
) -> Result<(), ServiceError> {
    get_staff(db, restaurant_id, id).await?;
    staff::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restaurant_service::create_restaurant;
    use crate::test_support::{get_db, gourmet_kitchen};

    #[tokio::test]
    async fn staff_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;

        let s = create_staff(&db, r.id, StaffFields {
            name: Some("John Smith".into()),
            email: Some("john.smith@gourmet.example".into()),
            role: Some("Manager".into()),
            phone: Some("+1-555-0101".into()),
            shift: Some("Day".into()),
        })
        .await?;
        assert_eq!(s.shift.as_deref(), Some("Day"));

        let evening = StaffFields {
            shift: Some("Evening".into()),
            ..Default::default()
        };
        let moved = update_staff(&db, r.id, s.id, evening).await?;
        assert_eq!(moved.shift.as_deref(), Some("Evening"));
        assert_eq!(moved.role, "Manager");

        let nameless = StaffFields {
            name: Some("Nobody".into()),
            ..Default::default()
        };
        let missing = create_staff(&db, r.id, nameless).await;
        let Err(ServiceError::Validation(fields)) = missing else {
            panic!("expected a validation error");
        };
        assert!(fields.contains("email"));
        assert!(fields.contains("role"));

        delete_staff(&db, r.id, s.id).await?;
        assert!(list_staff(&db, r.id).await?.is_empty());
        Ok(())
    }
}
