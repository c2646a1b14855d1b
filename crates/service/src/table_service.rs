use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use models::dining_table::{self, TableFields};
use models::{clock, patch, reservation};

use crate::errors::ServiceError;
use crate::restaurant_service::require_restaurant;

/// Table numbers are unique within one restaurant.
async fn ensure_number_free<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    table_number: i32,
    except: Option<Uuid>,
) -> Result<(), ServiceError> {
    let mut q = dining_table::Entity::find()
        .filter(dining_table::Column::RestaurantId.eq(restaurant_id))
        .filter(dining_table::Column::TableNumber.eq(table_number));
    if let Some(id) = except {
        q = q.filter(dining_table::Column::Id.ne(id));
    }
    match q.one(db).await? {
        Some(_) => Err(ServiceError::Conflict(format!(
            "table number {table_number} already exists"
        ))),
        None => Ok(()),
    }
}

pub async fn create_table<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    fields: TableFields,
) -> Result<dining_table::Model, ServiceError> {
    require_restaurant(db, restaurant_id).await?;
    let model = fields.into_model(restaurant_id, clock::now())?;
    ensure_number_free(db, restaurant_id, model.table_number, None).await?;
    Ok(dining_table::ActiveModel::from(model).reset_all().insert(db).await?)
}

pub async fn get_table<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
) -> Result<dining_table::Model, ServiceError> {
    require_restaurant(db, restaurant_id).await?;
    find_table(db, restaurant_id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("table"))
}

/// Lookup without the restaurant check, for callers that already did it.
async fn find_table<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
) -> Result<Option<dining_table::Model>, ServiceError> {
    Ok(dining_table::Entity::find_by_id(id)
        .filter(dining_table::Column::RestaurantId.eq(restaurant_id))
        .one(db)
        .await?)
}

/// Tables in creation order.
pub async fn list_tables<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
) -> Result<Vec<dining_table::Model>, ServiceError> {
    require_restaurant(db, restaurant_id).await?;
    Ok(dining_table::Entity::find()
        .filter(dining_table::Column::RestaurantId.eq(restaurant_id))
        .order_by_asc(dining_table::Column::CreatedAt)
        .order_by_asc(dining_table::Column::Id)
        .all(db)
        .await?)
}

pub async fn update_table<C: ConnectionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
    fields: TableFields,
) -> Result<dining_table::Model, ServiceError> {
    let current = get_table(db, restaurant_id, id).await?;
    let mut next = current.clone();
    fields.apply_to(&mut next)?;
    if next.table_number != current.table_number {
        ensure_number_free(db, restaurant_id, next.table_number, Some(id)).await?;
    }
    next.updated_at = clock::after(&current.updated_at);
    Ok(patch::changed_columns::<dining_table::Entity>(&current, &next).update(db).await?)
}

/// Delete a table and detach the reservations that pointed at it.
pub async fn delete_table<C: TransactionTrait>(
    db: &C,
    restaurant_id: Uuid,
    id: Uuid,
) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    get_table(&txn, restaurant_id, id).await?;
    let detached = reservation::Entity::update_many()
        .col_expr(
            reservation::Column::TableId,
            Expr::value(Option::<Uuid>::None),
        )
        .col_expr(reservation::Column::UpdatedAt, Expr::value(clock::now()))
        .filter(reservation::Column::TableId.eq(id))
        .exec(&txn)
        .await?;
    dining_table::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    if detached.rows_affected > 0 {
        info!(
            table_id = %id,
            reservations = detached.rows_affected,
            "table_deleted_reservations_detached"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation_service::{create_reservation, get_reservation};
    use crate::restaurant_service::create_restaurant;
    use crate::test_support::{get_db, gourmet_kitchen, policy, reservation_at, table};

    #[tokio::test]
    async fn table_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;

        let window = TableFields {
            location: Some("Window".into()),
            ..table(1, 4)
        };
        let t = create_table(&db, r.id, window).await?;
        assert_eq!(t.status, dining_table::TableStatus::Available);
        assert_eq!(t.location.as_deref(), Some("Window"));

        let bigger = TableFields {
            capacity: Some(6),
            ..Default::default()
        };
        let t2 = update_table(&db, r.id, t.id, bigger).await?;
        assert_eq!(t2.capacity, 6);
        assert_eq!(t2.table_number, 1);

        delete_table(&db, r.id, t.id).await?;
        assert!(matches!(get_table(&db, r.id, t.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_table_numbers_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;
        let other = create_restaurant(&db, gourmet_kitchen()).await?;

        create_table(&db, r.id, table(1, 2)).await?;
        let t2 = create_table(&db, r.id, table(2, 2)).await?;
        create_table(&db, other.id, table(1, 2)).await?;

        assert!(matches!(
            create_table(&db, r.id, table(1, 8)).await,
            Err(ServiceError::Conflict(_))
        ));
        let taken = TableFields {
            table_number: Some(1),
            ..Default::default()
        };
        let renumber = update_table(&db, r.id, t2.id, taken).await;
        assert!(matches!(renumber, Err(ServiceError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn deleting_a_table_detaches_reservations() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let r = create_restaurant(&db, gourmet_kitchen()).await?;
        let t = create_table(&db, r.id, table(3, 4)).await?;
        let jane = reservation_at("Jane", "2024-02-01", "19:00", 2, Some(t.id));
        let res = create_reservation(&db, &policy(), r.id, jane).await?;
        assert_eq!(res.table_id, Some(t.id));

        delete_table(&db, r.id, t.id).await?;
        let after = get_reservation(&db, r.id, res.id).await?;
        assert_eq!(after.table_id, None);
        assert!(after.updated_at > res.updated_at);
        Ok(())
    }
}
