//! The cached view of the remote store.
//!
//! All reads go through the [`Cache`], all writes are performed
//! as cache mutations that invalidate the affected keys.

use std::{fmt, future::Future, sync::Arc};

use futures::{future::BoxFuture, FutureExt};

use crate::{
    cache::{Cache, CacheKey, Query},
    entities::*,
    save_toggle::{SaveState, SaveToggles},
    store::{self, Store},
    usecases::{self, Error, NewReview, Result},
    util::{filter, lookup, sort},
};

pub struct Client<S: ?Sized> {
    store: Arc<S>,
    cache: Cache,
    toggles: Arc<SaveToggles>,
}

impl<S: ?Sized> Clone for Client<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: self.cache.clone(),
            toggles: Arc::clone(&self.toggles),
        }
    }
}

impl<S: ?Sized> fmt::Debug for Client<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Client")
            .field("cache", &self.cache)
            .field("toggles", &self.toggles)
            .finish_non_exhaustive()
    }
}

// The cache only deals with failures of the store.
fn fetched<T>(res: Result<T>) -> store::Result<T> {
    res.map_err(|err| match err {
        Error::Store(err) => err,
        err => store::Error::Query(err.to_string()),
    })
}

impl<S> Client<S>
where
    S: Store + ?Sized + 'static,
{
    pub fn new(store: Arc<S>, cache: Cache) -> Self {
        Self {
            store,
            cache,
            toggles: Arc::new(SaveToggles::new()),
        }
    }

    pub const fn cache(&self) -> &Cache {
        &self.cache
    }

    fn fetch<T, F, Fut>(&self, op: F) -> impl FnOnce() -> BoxFuture<'static, store::Result<T>>
    where
        T: Send + 'static,
        F: FnOnce(Arc<S>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        move || async move { fetched(op(store).await) }.boxed()
    }

    pub async fn get_spots(&self) -> Result<Arc<Vec<Spot>>> {
        let fetch = self.fetch(|store| async move { usecases::get_spots(&*store).await });
        Ok(self.cache.get(CacheKey::spots(), fetch).await?)
    }

    /// The cached spots, refreshed in the background.
    pub fn spots_query(&self) -> Query<Vec<Spot>> {
        let fetch = self.fetch(|store| async move { usecases::get_spots(&*store).await });
        self.cache.query(CacheKey::spots(), fetch)
    }

    pub async fn get_spot(&self, id: SpotId) -> Result<Arc<Spot>> {
        let fetch = self.fetch(move |store| async move { usecases::get_spot(&*store, id).await });
        Ok(self.cache.get(CacheKey::spot(id), fetch).await?)
    }

    pub async fn get_reviews_for_spot(&self, spot_id: SpotId) -> Result<Arc<Vec<Review>>> {
        let fetch = self.fetch(move |store| async move {
            usecases::get_reviews_for_spot(&*store, spot_id).await
        });
        Ok(self.cache.get(CacheKey::reviews(spot_id), fetch).await?)
    }

    pub async fn get_saved_spots(&self) -> Result<Arc<Vec<SavedSpot>>> {
        let fetch = self.fetch(|store| async move { usecases::get_saved_spots(&*store).await });
        Ok(self.cache.get(CacheKey::saved(), fetch).await?)
    }

    /// The cached bookmarks, refreshed in the background.
    pub fn saved_query(&self) -> Query<Vec<SavedSpot>> {
        let fetch = self.fetch(|store| async move { usecases::get_saved_spots(&*store).await });
        self.cache.query(CacheKey::saved(), fetch)
    }

    pub async fn near_spots(&self, limit: usize) -> Result<Vec<Spot>> {
        let spots = self.get_spots().await?;
        Ok(sort::rank_by_nearness(&spots, limit))
    }

    pub async fn popular_spots(&self, limit: usize) -> Result<Vec<Spot>> {
        let spots = self.get_spots().await?;
        Ok(sort::rank_by_popularity(&spots, limit))
    }

    pub async fn search_spots(&self, query: &str) -> Result<Vec<Spot>> {
        let spots = self.get_spots().await?;
        Ok(filter::search(&spots, query))
    }

    pub async fn saved_lookup(&self) -> Result<lookup::SavedLookup> {
        let saved = self.get_saved_spots().await?;
        Ok(lookup::saved_lookup(&saved))
    }

    pub async fn has_reviewed(&self, spot_id: SpotId) -> Result<bool> {
        let reviews = self.get_reviews_for_spot(spot_id).await?;
        Ok(lookup::has_reviewed(&reviews))
    }

    /// The state of the save button of a spot.
    pub async fn save_state(&self, spot_id: SpotId) -> Result<SaveState> {
        if let Some(state) = self.toggles.state(spot_id).filter(|s| s.is_pending()) {
            return Ok(state);
        }
        let lookup = self.saved_lookup().await?;
        Ok(SaveState::from_saved(lookup.is_saved(spot_id)))
    }

    /// Saves an unsaved spot or removes the bookmark of a saved spot.
    ///
    /// Returns the settled state. If the request failed the
    /// previous state is restored and the error is returned.
    pub async fn toggle_saved(&self, spot_id: SpotId, snapshot: SpotSnapshot) -> Result<SaveState> {
        let Some(claim) = self.toggles.claim(spot_id) else {
            log::warn!("Ignoring toggle of spot {spot_id} while a request is pending");
            return Err(Error::ToggleInProgress(spot_id));
        };
        let saved_id = self.saved_lookup().await?.saved_id(spot_id).cloned();
        let pending = claim.begin(saved_id.is_some());
        log::debug!("Toggling spot {spot_id}: {pending}");
        let invalidates = [CacheKey::saved()];
        let res = match saved_id {
            None => self
                .cache
                .mutate(usecases::save_spot(&*self.store, spot_id, snapshot), &invalidates)
                .await
                .map(|_| ()),
            Some(saved_id) => {
                self.cache
                    .mutate(usecases::unsave_spot(&*self.store, &saved_id), &invalidates)
                    .await
            }
        };
        let state = claim.finish(res.is_ok());
        res.map(|()| state)
    }

    /// Validates and stores a review.
    ///
    /// Invalid reviews are rejected without contacting the store.
    pub async fn submit_review(
        &self,
        spot_id: SpotId,
        spot_name: String,
        ratings: ReviewRatings,
        text: String,
    ) -> Result<Review> {
        let review = usecases::prepare_new_review(NewReview {
            spot_id,
            spot_name,
            ratings,
            text,
        })?;
        // The store aggregates the ratings of the spot
        let invalidates = [
            CacheKey::reviews(spot_id),
            CacheKey::spot(spot_id),
            CacheKey::spots(),
        ];
        self.cache
            .mutate(usecases::store_new_review(&*self.store, review), &invalidates)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        access,
        cache::Status,
        store::{memory::*, Collection, Error as StoreError},
    };
    use study604_entities::builders::*;

    async fn setup() -> (Arc<MemoryStore>, Client<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let spots = [
            Spot::build().id(7).name("X").nearness(300.0).popularity(5.0),
            Spot::build().id(8).name("Revolver").nearness(100.0).popularity(9.0),
            Spot::build().id(9).name("Nemesis").nearness(200.0).popularity(7.0),
        ];
        for spot in spots {
            access::insert(&*store, spot.finish()).await.unwrap();
        }
        let client = Client::new(Arc::clone(&store), Cache::new());
        (store, client)
    }

    fn snapshot() -> SpotSnapshot {
        Spot::build()
            .name("X")
            .address("Y")
            .rating(4.5)
            .image("z.jpg")
            .finish()
            .snapshot()
    }

    fn ratings(values: [u8; 5]) -> ReviewRatings {
        let [atmosphere, wifi, outlet_access, food_beverage, table_space] =
            values.map(RatingValue::from);
        ReviewRatings {
            atmosphere,
            wifi,
            outlet_access,
            food_beverage,
            table_space,
        }
    }

    #[tokio::test]
    async fn reads_are_cached() {
        let (store, client) = setup().await;
        assert_eq!(3, client.get_spots().await.unwrap().len());
        assert_eq!(3, client.get_spots().await.unwrap().len());
        assert_eq!(1, store.calls(Op::SelectAll, Collection::Spots));
        assert_eq!("Revolver", client.get_spot(SpotId::new(8)).await.unwrap().name);
    }

    #[tokio::test]
    async fn missing_spot() {
        let (_, client) = setup().await;
        assert!(client.get_spot(SpotId::new(1)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn ranked_lists() {
        let (_, client) = setup().await;
        let ids = |spots: Vec<Spot>| spots.iter().map(|s| s.id.get()).collect::<Vec<_>>();
        assert_eq!(vec![8, 9], ids(client.near_spots(2).await.unwrap()));
        assert_eq!(vec![8, 9, 7], ids(client.popular_spots(5).await.unwrap()));
        assert_eq!(vec![9], ids(client.search_spots("nemesis").await.unwrap()));
    }

    #[tokio::test]
    async fn toggle_unsaved_spot() {
        let (store, client) = setup().await;
        let spot_id = SpotId::new(7);
        assert_eq!(SaveState::Unsaved, client.save_state(spot_id).await.unwrap());

        let state = client.toggle_saved(spot_id, snapshot()).await.unwrap();
        assert_eq!(SaveState::Saved, state);
        assert_eq!(1, store.calls(Op::Insert, Collection::Saved));

        let lookup = client.saved_lookup().await.unwrap();
        assert!(lookup.spot_ids.contains("7"));
        let saved = client.get_saved_spots().await.unwrap();
        assert_eq!("X", saved[0].spot.name);
        assert_eq!("Y", saved[0].spot.address);
        assert_eq!("z.jpg", saved[0].spot.image);
    }

    #[tokio::test]
    async fn save_and_unsave_round_trip() {
        let (store, client) = setup().await;
        let spot_id = SpotId::new(7);
        client.toggle_saved(spot_id, snapshot()).await.unwrap();
        let state = client.toggle_saved(spot_id, snapshot()).await.unwrap();
        assert_eq!(SaveState::Unsaved, state);
        assert!(client.saved_lookup().await.unwrap().spot_ids.is_empty());
        assert_eq!(1, store.calls(Op::Delete, Collection::Saved));
        assert_eq!(SaveState::Unsaved, client.save_state(spot_id).await.unwrap());
    }

    #[tokio::test]
    async fn failed_save_reverts() {
        let (store, client) = setup().await;
        let spot_id = SpotId::new(7);
        client.get_saved_spots().await.unwrap();
        store.fail_next(Op::Insert, StoreError::Timeout);
        assert_eq!(
            Err(Error::Store(StoreError::Timeout)),
            client.toggle_saved(spot_id, snapshot()).await
        );
        assert_eq!(SaveState::Unsaved, client.save_state(spot_id).await.unwrap());
        assert_eq!(Status::Fresh, client.cache().status(&CacheKey::saved()));
    }

    #[tokio::test]
    async fn failed_unsave_reverts() {
        let (store, client) = setup().await;
        let spot_id = SpotId::new(7);
        client.toggle_saved(spot_id, snapshot()).await.unwrap();
        store.fail_next(Op::Delete, StoreError::Unauthorized);
        assert!(client.toggle_saved(spot_id, snapshot()).await.is_err());
        assert_eq!(SaveState::Saved, client.save_state(spot_id).await.unwrap());
    }

    #[tokio::test]
    async fn reject_toggle_while_saving() {
        let (store, client) = setup().await;
        store.set_latency(Duration::from_millis(20));
        let spot_id = SpotId::new(7);
        let (a, b) = tokio::join!(
            client.toggle_saved(spot_id, snapshot()),
            client.toggle_saved(spot_id, snapshot()),
        );
        let mut results = [a, b];
        results.sort_by_key(|r| r.is_err());
        assert_eq!(Ok(SaveState::Saved), results[0]);
        assert_eq!(Err(Error::ToggleInProgress(spot_id)), results[1]);
        assert_eq!(1, store.calls(Op::Insert, Collection::Saved));
    }

    #[tokio::test]
    async fn reject_toggle_while_saving_with_stale_bookmarks() {
        let (store, client) = setup().await;
        store.set_latency(Duration::from_millis(50));
        let spot_id = SpotId::new(7);
        let first = client.toggle_saved(spot_id, snapshot());
        let second = async {
            // The bookmarks are read and the insert is in flight
            tokio::time::sleep(Duration::from_millis(75)).await;
            client.cache().invalidate(&CacheKey::saved());
            assert_eq!(SaveState::Saving, client.save_state(spot_id).await.unwrap());
            client.toggle_saved(spot_id, snapshot()).await
        };
        let (a, b) = tokio::join!(first, second);
        assert_eq!(Ok(SaveState::Saved), a);
        assert_eq!(Err(Error::ToggleInProgress(spot_id)), b);
        assert_eq!(1, store.calls(Op::Insert, Collection::Saved));
        assert_eq!(1, store.rows(Collection::Saved).len());
    }

    #[tokio::test]
    async fn invalid_review_is_rejected_without_network() {
        let (store, client) = setup().await;
        let calls = store.total_calls();
        let res = client
            .submit_review(
                SpotId::new(7),
                "X".into(),
                ratings([0, 4, 4, 4, 4]),
                "".into(),
            )
            .await;
        assert_eq!(
            Err(Error::Validation(vec![RatingCategory::Atmosphere])),
            res.map(|r| r.id)
        );
        assert_eq!(calls, store.total_calls());
    }

    #[tokio::test]
    async fn submitted_review_is_visible() {
        let (_, client) = setup().await;
        let spot_id = SpotId::new(7);
        assert!(!client.has_reviewed(spot_id).await.unwrap());
        client
            .submit_review(spot_id, "X".into(), ratings([4, 4, 4, 4, 4]), "Quiet".into())
            .await
            .unwrap();
        assert_eq!(Status::Stale, client.cache().status(&CacheKey::reviews(spot_id)));
        assert!(client.has_reviewed(spot_id).await.unwrap());
        assert!(!client.has_reviewed(SpotId::new(8)).await.unwrap());
    }

    #[tokio::test]
    async fn query_serves_previous_value() {
        let (store, client) = setup().await;
        assert!(client.spots_query().settled().await.is_ok());
        store.fail_next(Op::SelectAll, StoreError::Transport("offline".into()));
        let query = client.spots_query();
        assert_eq!(3, query.data.as_ref().map(|s| s.len()).unwrap_or_default());
        assert!(query.settled().await.is_err());
        assert!(matches!(
            client.cache().status(&CacheKey::spots()),
            Status::Errored(StoreError::Transport(_))
        ));
    }
}
