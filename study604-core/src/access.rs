// Typed access to the collections of the remote store.
// Rows are validated on every read. Rows of a listing that
// fail validation are skipped, single rows fail the request.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    entities::*,
    store::{Collection, Error, Result, Row, Store},
};
use study604_boundary as b;

/// An entity that is stored as a row of a collection.
pub trait Record: Sized + Send + Sync + 'static {
    const COLLECTION: Collection;

    type Row: Serialize + DeserializeOwned + TryInto<Self, Error = b::RowInvalidation> + From<Self>;
}

impl Record for Spot {
    const COLLECTION: Collection = Collection::Spots;
    type Row = b::Spot;
}

impl Record for SavedSpot {
    const COLLECTION: Collection = Collection::Saved;
    type Row = b::SavedSpot;
}

impl Record for Review {
    const COLLECTION: Collection = Collection::Reviews;
    type Row = b::Review;
}

fn invalid_row<T: Record>(reason: impl ToString) -> Error {
    Error::InvalidRow {
        collection: T::COLLECTION,
        reason: reason.to_string(),
    }
}

fn from_row<T: Record>(row: Row) -> Result<T> {
    let row: T::Row = serde_json::from_value(Value::Object(row)).map_err(invalid_row::<T>)?;
    row.try_into().map_err(invalid_row::<T>)
}

fn into_row<T: Record>(record: T) -> Result<Row> {
    match serde_json::to_value(T::Row::from(record)).map_err(invalid_row::<T>)? {
        Value::Object(row) => Ok(row),
        _ => Err(invalid_row::<T>("not an object")),
    }
}

fn from_rows<T: Record>(rows: Vec<Row>) -> Vec<T> {
    let total = rows.len();
    let records: Vec<T> = rows
        .into_iter()
        .filter_map(|row| match from_row(row) {
            Ok(record) => Some(record),
            Err(err) => {
                log::warn!("Skipping row: {err}");
                None
            }
        })
        .collect();
    if records.len() < total {
        log::warn!(
            "Skipped {} of {total} rows in '{}'",
            total - records.len(),
            T::COLLECTION
        );
    }
    records
}

/// All records of a collection in insertion order.
pub async fn fetch_all<T, S>(store: &S) -> Result<Vec<T>>
where
    T: Record,
    S: Store + ?Sized,
{
    let rows = store.select_all(T::COLLECTION).await?;
    Ok(from_rows(rows))
}

/// The single record with the given id.
pub async fn fetch_by_id<T, S>(store: &S, id: &str) -> Result<T>
where
    T: Record,
    S: Store + ?Sized,
{
    let mut rows = store.select_by_id(T::COLLECTION, id).await?;
    match rows.len() {
        0 => Err(Error::NotFound),
        1 => from_row(rows.remove(0)),
        _ => Err(Error::AmbiguousResult {
            collection: T::COLLECTION,
            id: id.to_string(),
        }),
    }
}

/// All records whose `field` equals `value`.
pub async fn fetch_where<T, S>(store: &S, field: &str, value: &str) -> Result<Vec<T>>
where
    T: Record,
    S: Store + ?Sized,
{
    let rows = store.select_where(T::COLLECTION, field, value).await?;
    Ok(from_rows(rows))
}

/// Stores a new record and returns it as stored.
pub async fn insert<T, S>(store: &S, record: T) -> Result<T>
where
    T: Record,
    S: Store + ?Sized,
{
    let row = into_row(record)?;
    let stored = store.insert(T::COLLECTION, row).await?;
    from_row(stored)
}

/// Removes the record with the given id, if any.
pub async fn remove<T, S>(store: &S, id: &str) -> Result<()>
where
    T: Record,
    S: Store + ?Sized,
{
    store.delete(T::COLLECTION, id).await
}
