use std::fmt::Debug;

use log::warn;
use model::{MalformedRecord, WithId};
use serde::Serialize;
use utility::id::{HasId, Id};

pub mod resource;

pub trait DatabaseRow {
    type Model: Serialize + HasId;

    fn get_id(&self) -> Id<Self::Model>;
    fn to_model(self) -> Result<Self::Model, MalformedRecord>;
}

/// Converts rows, leaving out (and logging) every row that fails the shape
/// checks.
pub fn with_ids<R: DatabaseRow>(rows: Vec<R>) -> Vec<WithId<R::Model>>
where
    <R::Model as HasId>::IdType: Debug + Clone + Serialize,
{
    rows.into_iter().filter_map(|row| with_id(row)).collect()
}

pub fn with_id<R: DatabaseRow>(row: R) -> Option<WithId<R::Model>>
where
    <R::Model as HasId>::IdType: Debug + Clone + Serialize,
{
    let id = row.get_id();
    match row.to_model() {
        Ok(model) => Some(WithId::new(id, model)),
        Err(why) => {
            warn!("Skipping stored row {:?}: {}", id, why);
            None
        }
    }
}
