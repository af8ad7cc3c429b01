use std::sync::Arc;

use crate::{
    error::StoreError,
    store::{Store, TweetStore, UserStore},
};

/// Handles shared by every request.
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tweets: Arc<dyn TweetStore>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, tweets: Arc<dyn TweetStore>) -> Arc<Self> {
        Arc::new(Self { users, tweets })
    }

    pub fn from_store(store: &Store) -> Result<Arc<Self>, StoreError> {
        Ok(Self::new(Arc::new(store.users()?), Arc::new(store.tweets()?)))
    }
}
