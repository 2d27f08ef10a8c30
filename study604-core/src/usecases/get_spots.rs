use super::prelude::*;

pub async fn get_spots<S: Store + ?Sized>(store: &S) -> Result<Vec<Spot>> {
    Ok(access::fetch_all(store).await?)
}

pub async fn get_spot<S: Store + ?Sized>(store: &S, id: SpotId) -> Result<Spot> {
    Ok(access::fetch_by_id(store, &id.to_string()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{memory::*, Collection, Error as StoreError};
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::from_json(json!({
            "spots": [
                {
                    "id": 1, "name": "Revolver", "address": "325 Cambie St",
                    "position": {"lat": 49.283, "lng": -123.109},
                    "image": "revolver.jpg", "rating": 4.6,
                    "wifi": true, "food": true, "popularity": 90, "nearness": 450,
                    "atmosphere_rating": 4.5, "wifi_rating": 4.0, "outlet_access_rating": 3.0,
                    "food_beverage_rating": 5.0, "table_space_rating": 2.5
                },
                {
                    "id": 2, "name": "Nemesis", "address": "302 W Hastings St",
                    "position": {"lat": 49.282, "lng": -123.110},
                    "image": "nemesis.jpg", "rating": 4.2,
                    "wifi": true, "food": true, "popularity": 70, "nearness": 900,
                    "atmosphere_rating": 4.0, "wifi_rating": 3.5, "outlet_access_rating": 2.0,
                    "food_beverage_rating": 4.5, "table_space_rating": 3.0
                }
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn get_all_spots() {
        let store = store();
        let spots = get_spots(&store).await.unwrap();
        assert_eq!(2, spots.len());
        assert_eq!("Revolver", spots[0].name);
        assert_eq!(1, store.calls(Op::SelectAll, Collection::Spots));
    }

    #[tokio::test]
    async fn get_single_spot() {
        let store = store();
        let spot = get_spot(&store, SpotId::new(2)).await.unwrap();
        assert_eq!("Nemesis", spot.name);
        assert!(get_spot(&store, SpotId::new(3))
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn store_failures_are_passed_through() {
        let store = store();
        store.fail_next(Op::SelectAll, StoreError::Unauthorized);
        assert_eq!(
            Err(Error::Store(StoreError::Unauthorized)),
            get_spots(&store).await
        );
    }
}
