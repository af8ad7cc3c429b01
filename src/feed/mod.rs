//! Feed assembly.
//!
//! Reads every tweet newest-first and then looks up each author, one point
//! lookup per tweet. Output order is the tweet order; nothing is deduplicated.

use crate::{
    error::StoreError,
    models::FeedItem,
    store::{TweetStore, UserStore},
};

pub fn assemble(
    tweets: &dyn TweetStore,
    users: &dyn UserStore,
) -> Result<Vec<FeedItem>, StoreError> {
    tweets
        .list_all_newest_first()?
        .into_iter()
        .map(|tweet| -> Result<FeedItem, StoreError> {
            let author = users.find_by_username(&tweet.username)?;
            Ok(FeedItem::new(tweet, author))
        })
        .collect()
}
