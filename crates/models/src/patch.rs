use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Iterable, ModelTrait};

/// Active model that writes only the columns where `patched` differs from `original`.
///
/// Unchanged columns stay `Unchanged`, so an update never overwrites a
/// concurrent write to a field the caller did not touch.
pub fn changed_columns<E>(original: &E::Model, patched: &E::Model) -> E::ActiveModel
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Clone,
{
    let mut am = original.clone().into_active_model();
    for col in E::Column::iter() {
        let next = patched.get(col);
        if original.get(col) != next {
            am.set(col, next);
        }
    }
    am
}
